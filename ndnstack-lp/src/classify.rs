//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use ndnstack_tlv::{DecodeError, DecodeResult, ElementDef, Tlv};

use ndnstack_packet::an::tt;
use ndnstack_packet::{Data, Interest, Nack};

use crate::fragment::FragmentHeader;
use crate::pit_token::PitToken;

/// L3 header fields an LpPacket carries alongside its payload: the PIT
/// token and, for a Nack, the raw `TT::Nack` TLV bytes (header only, not
/// the Interest it wraps).
#[derive(Clone, Copy, Debug, Default)]
pub struct L3Header<'b> {
    pub pit_token: PitToken,
    pub nack: Option<&'b [u8]>,
}

/// The result of classifying one received LpPacket (or bare L3 packet).
#[derive(Clone, Copy, Debug)]
pub enum Classified<'b> {
    /// One fragment of a multi-fragment payload; hand to a [`crate::Reassembler`].
    Fragment {
        header: FragmentHeader,
        l3: L3Header<'b>,
        payload: &'b [u8],
    },
    Interest { l3: L3Header<'b>, interest: Interest<'b> },
    Data { l3: L3Header<'b>, data: Data<'b> },
    Nack { l3: L3Header<'b>, nack: Nack<'b> },
}

/// LP header TLV-TYPEs are non-critical only within 800..=959 and only
/// when a multiple of 4; everything else follows the usual rule that an
/// unrecognized TLV is critical.
fn is_critical(tlv_type: u32) -> bool {
    if (800..=959).contains(&tlv_type) {
        tlv_type % 4 != 0
    } else {
        true
    }
}

/// Classifies a decoded top-level TLV as either a bare L3 packet
/// (Interest/Data, received directly with no LP framing) or an LpPacket
/// carrying a fragment, Interest, Data, or Nack.
pub fn classify<'b>(tlv: &Tlv<'b>) -> DecodeResult<Classified<'b>> {
    if tlv.tlv_type != tt::LP_PACKET {
        return classify_bare(tlv, L3Header::default());
    }

    let mut seq_num = 0u64;
    let mut frag_index = 0u8;
    let mut frag_count = 1u8;
    let mut pit_token = PitToken::empty();
    let mut nack: Option<&[u8]> = None;
    let mut payload: Option<&[u8]> = None;

    ndnstack_tlv::ev_decoder::decode_value_ex(
        tlv.decoder(),
        &mut [
            ElementDef::fallible(tt::LP_SEQ_NUM, |d| match ndnstack_tlv::nni::decode(d, u64::MAX) {
                Ok(v) => {
                    seq_num = v;
                    true
                }
                Err(_) => false,
            })
            .with_order(0),
            ElementDef::fallible(tt::FRAG_INDEX, |d| match ndnstack_tlv::nni::decode(d, u8::MAX as u64) {
                Ok(v) => {
                    frag_index = v as u8;
                    true
                }
                Err(_) => false,
            })
            .with_order(100),
            ElementDef::fallible(tt::FRAG_COUNT, |d| match ndnstack_tlv::nni::decode(d, u8::MAX as u64) {
                Ok(v) => {
                    frag_count = v as u8;
                    true
                }
                Err(_) => false,
            })
            .with_order(200),
            ElementDef::fallible(tt::PIT_TOKEN, |d| {
                match PitToken::from_bytes(d.value) {
                    Some(t) => {
                        pit_token = t;
                        true
                    }
                    None => false,
                }
            })
            .with_order(300),
            ElementDef::new(tt::NACK, |d| nack = Some(d.tlv)).with_order(400),
            ElementDef::new(tt::LP_PAYLOAD, |d| payload = Some(d.value)).with_order(500),
        ],
        is_critical,
        |_d| false,
    )?;

    let l3 = L3Header { pit_token, nack };

    if frag_count > 1 {
        let payload = payload.ok_or(DecodeError::UnexpectedTopType(tt::LP_PACKET))?;
        return Ok(Classified::Fragment {
            header: FragmentHeader {
                seq_num,
                frag_index,
                frag_count,
            },
            l3,
            payload,
        });
    }

    let payload = match payload {
        Some(p) => p,
        None => return Err(DecodeError::UnexpectedTopType(tt::LP_PACKET)),
    };
    let (inner, _) = Tlv::read(payload).map_err(|_| DecodeError::UnexpectedTopType(tt::LP_PACKET))?;

    if let Some(nack_bytes) = nack {
        let interest = Interest::decode(&inner)?;
        let (nack_tlv, _) = Tlv::read(nack_bytes).map_err(|_| DecodeError::UnexpectedTopType(tt::NACK))?;
        let nack = Nack::decode_header(&nack_tlv, interest)?;
        return Ok(Classified::Nack { l3, nack });
    }

    classify_bare(&inner, l3)
}

fn classify_bare<'b>(tlv: &Tlv<'b>, l3: L3Header<'b>) -> DecodeResult<Classified<'b>> {
    match tlv.tlv_type {
        tt::INTEREST => Ok(Classified::Interest {
            l3,
            interest: Interest::decode(tlv)?,
        }),
        tt::DATA => Ok(Classified::Data {
            l3,
            data: Data::decode(tlv)?,
        }),
        other => Err(DecodeError::UnexpectedTopType(other)),
    }
}

#[cfg(test)]
mod tests {
    use ndnstack_packet::Name;
    use ndnstack_region::Region;

    use super::*;
    use crate::fragment::Fragmenter;

    #[test]
    fn classifies_bare_interest() {
        let mut storage = [0u8; 256];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let interest = Interest::new(name);
        let wire = interest.encode(&region).unwrap();
        let (tlv, _) = Tlv::read(wire).unwrap();
        match classify(&tlv).unwrap() {
            Classified::Interest { interest: decoded, .. } => {
                assert_eq!(decoded.nonce, interest.nonce)
            }
            other => panic!("expected Interest, got {other:?}"),
        }
    }

    #[test]
    fn classifies_wrapped_interest_with_pit_token() {
        let mut storage = [0u8; 1024];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let interest = Interest::new(name);
        let wire = interest.encode(&region).unwrap();

        let fragmenter = Fragmenter::new(1500);
        let fragments = fragmenter
            .fragment(&region, wire, PitToken::from4(9), None)
            .unwrap();
        let (tlv, _) = Tlv::read(fragments[0]).unwrap();
        match classify(&tlv).unwrap() {
            Classified::Interest { l3, .. } => assert_eq!(l3.pit_token.to4(), Some(9)),
            other => panic!("expected Interest, got {other:?}"),
        }
    }

    #[test]
    fn classifies_fragment_of_split_payload() {
        let mut storage = [0u8; 4096];
        let region = Region::new(&mut storage);
        let payload = vec![0x11u8; 200];
        let fragmenter = Fragmenter::new(64);
        let fragments = fragmenter
            .fragment(&region, &payload, PitToken::from4(3), None)
            .unwrap();
        assert!(fragments.len() > 1);
        let (tlv, _) = Tlv::read(fragments[0]).unwrap();
        match classify(&tlv).unwrap() {
            Classified::Fragment { header, .. } => {
                assert_eq!(header.frag_index, 0);
                assert!(header.frag_count > 1);
            }
            other => panic!("expected Fragment, got {other:?}"),
        }
    }
}
