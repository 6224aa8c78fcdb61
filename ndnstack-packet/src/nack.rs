//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use ndnstack_region::Region;
use ndnstack_tlv::{DecodeResult, Encoder, Tlv};

use crate::an::{tt, NackReason};
use crate::interest::Interest;

/// A Nack: a NackReason together with the Interest it responds to.
///
/// Per the LP spec the Nack header only needs to carry the reason; this
/// type also keeps the Interest so a forwarder can look at it without a
/// separate decode.
#[derive(Clone, Copy, Debug)]
pub struct Nack<'b> {
    pub reason: NackReason,
    pub interest: Interest<'b>,
}

impl<'b> Nack<'b> {
    pub fn new(interest: Interest<'b>, reason: NackReason) -> Nack<'b> {
        Nack { reason, interest }
    }

    /// Encodes just the Nack header (`TT::Nack` wrapping `TT::NackReason`);
    /// the accompanying Interest is carried separately as the LP payload.
    pub fn encode_header(&self, region: &'b Region<'b>) -> Option<&'b [u8]> {
        let mut enc = Encoder::new(region)?;
        enc.prepend_tlv(tt::NACK, false, |e| {
            if !matches!(self.reason, NackReason::Unspecified) {
                e.prepend_tlv(tt::NACK_REASON, false, |e| {
                    ndnstack_tlv::nni::encode(e, self.reason.to_wire())
                });
            }
        });
        if !enc.is_ok() {
            enc.discard();
            return None;
        }
        Some(enc.trim())
    }

    /// Decodes a Nack header TLV against the Interest it accompanies.
    pub fn decode_header(tlv: &Tlv<'b>, interest: Interest<'b>) -> DecodeResult<Nack<'b>> {
        let mut reason_wire = 0u64;
        ndnstack_tlv::ev_decoder::decode(
            tlv,
            &[tt::NACK],
            vec![ndnstack_tlv::ElementDef::fallible(tt::NACK_REASON, |d| {
                match ndnstack_tlv::nni::decode(d, u64::MAX) {
                    Ok(v) => {
                        reason_wire = v;
                        true
                    }
                    Err(_) => false,
                }
            })],
        )?;
        Ok(Nack {
            reason: NackReason::from_wire(reason_wire),
            interest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Name;

    #[test]
    fn round_trips_nack_reason() {
        let mut storage = [0u8; 256];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let interest = Interest::new(name);
        let nack = Nack::new(interest, NackReason::NoRoute);
        let wire = nack.encode_header(&region).unwrap();
        let (tlv, _) = Tlv::read(wire).unwrap();
        let decoded = Nack::decode_header(&tlv, interest).unwrap();
        assert_eq!(decoded.reason, NackReason::NoRoute);
    }

    #[test]
    fn unspecified_reason_is_omitted() {
        let mut storage = [0u8; 256];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let interest = Interest::new(name);
        let nack = Nack::new(interest, NackReason::Unspecified);
        let wire = nack.encode_header(&region).unwrap();
        // TT::Nack (0x0320) needs the 3-octet VAR-NUMBER form.
        assert_eq!(wire, &[0xFD, 0x03, 0x20, 0x00]);
    }
}
