//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! Signature fields (`SigInfo`) and the signer/verifier traits packet
//! types are generic over.
//!
//! Concrete signing keys (digest-only, HMAC-SHA-256, ECDSA P-256, null)
//! live outside this crate and implement [`Signer`]/[`Verifier`]; `Name`
//! is the only packet type they need, so defining the traits here (rather
//! than alongside the concrete keys) avoids a dependency cycle.

use ndnstack_region::Region;
use ndnstack_tlv::{DecodeResult, ElementDef, Encoder, Tlv};

use crate::an::tt;
use crate::name::Name;

/// A key capable of producing a signature over a signed portion split
/// into disjoint byte ranges (e.g. Interest name + parameters digest, or
/// a Data packet's name/metainfo/content).
pub trait Signer {
    /// The SignatureType assigned number this key produces.
    fn sig_type(&self) -> u8;

    /// KeyLocator name to record in SigInfo, if any.
    fn key_locator(&self) -> Option<Name<'_>>;

    /// Upper bound on the encoded signature length, used to reserve room
    /// before the actual length is known.
    fn max_sig_len(&self) -> usize;

    /// Signs the concatenation of `parts`, writing into `out` and
    /// returning the number of bytes written, or `None` on failure.
    fn sign(&self, parts: &[&[u8]], out: &mut [u8]) -> Option<usize>;
}

/// The counterpart of [`Signer`]: checks a signature over the same kind
/// of signed portion.
pub trait Verifier {
    fn verify(&self, parts: &[&[u8]], sig: &[u8]) -> bool;
}

/// Fields common to Interest (`ISigInfo`) and Data (`DSigInfo`) signature
/// info blocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct SigInfo<'b> {
    pub sig_type: u8,
    pub key_locator: Option<Name<'b>>,
    /// ValidityPeriod extension, as `(not_before, not_after)` Unix
    /// timestamps in seconds. Only meaningful on certificates.
    pub validity_period: Option<(u64, u64)>,
}

impl<'b> SigInfo<'b> {
    pub fn from_signer(signer: &dyn Signer) -> SigInfo<'static> {
        SigInfo {
            sig_type: signer.sig_type(),
            key_locator: None,
            validity_period: None,
        }
    }

    pub fn decode(tlv: &Tlv<'b>, top_type: u32) -> DecodeResult<SigInfo<'b>> {
        let mut sig_type = 0u8;
        let mut key_locator = None;
        let mut validity_period = None;
        ndnstack_tlv::ev_decoder::decode(
            tlv,
            &[top_type],
            vec![
                ElementDef::fallible(tt::SIG_TYPE, |d| {
                    match ndnstack_tlv::nni::decode(d, u8::MAX as u64) {
                        Ok(v) => {
                            sig_type = v as u8;
                            true
                        }
                        Err(_) => false,
                    }
                })
                .with_order(100),
                ElementDef::fallible(tt::KEY_LOCATOR, |d| {
                    let mut name = None;
                    let ok = ndnstack_tlv::ev_decoder::decode_value(
                        d.decoder(),
                        vec![ElementDef::fallible(tt::NAME, |nd| {
                            name = Name::from_tlv(nd).ok();
                            name.is_some()
                        })],
                    )
                    .is_ok();
                    key_locator = name;
                    ok
                })
                .with_order(200),
                ElementDef::fallible(tt::VALIDITY_PERIOD, |d| {
                    let mut not_before = 0u64;
                    let mut not_after = 0u64;
                    let ok = ndnstack_tlv::ev_decoder::decode_value(
                        d.decoder(),
                        vec![
                            ElementDef::fallible(tt::NOT_BEFORE, |nd| {
                                match ndnstack_tlv::nni::decode(nd, u64::MAX) {
                                    Ok(v) => {
                                        not_before = v;
                                        true
                                    }
                                    Err(_) => false,
                                }
                            }),
                            ElementDef::fallible(tt::NOT_AFTER, |nd| {
                                match ndnstack_tlv::nni::decode(nd, u64::MAX) {
                                    Ok(v) => {
                                        not_after = v;
                                        true
                                    }
                                    Err(_) => false,
                                }
                            }),
                        ],
                    )
                    .is_ok();
                    if ok {
                        validity_period = Some((not_before, not_after));
                    }
                    ok
                })
                .with_order(300),
            ],
        )?;
        Ok(SigInfo {
            sig_type,
            key_locator,
            validity_period,
        })
    }

    pub fn encode_to(&self, tlv_type: u32, encoder: &mut Encoder<'_>) {
        encoder.prepend_tlv(tlv_type, false, |e| {
            if let Some((not_before, not_after)) = self.validity_period {
                e.prepend_tlv(tt::VALIDITY_PERIOD, false, |e| {
                    e.prepend_tlv(tt::NOT_AFTER, false, |e| {
                        ndnstack_tlv::nni::encode(e, not_after)
                    });
                    e.prepend_tlv(tt::NOT_BEFORE, false, |e| {
                        ndnstack_tlv::nni::encode(e, not_before)
                    });
                });
            }
            if let Some(name) = &self.key_locator {
                e.prepend_tlv(tt::KEY_LOCATOR, false, |e| name.encode_to(e));
            }
            e.prepend_tlv(tt::SIG_TYPE, false, |e| {
                ndnstack_tlv::nni::encode(e, self.sig_type as u64)
            });
        });
    }
}

/// Signs `parts` with `key`, recording its key locator in a freshly-built
/// [`SigInfo`], and writes the signature into a region-allocated buffer.
///
/// Returns `(sig_info, signature_bytes)`.
pub fn sign_parts<'b>(
    region: &'b Region<'b>,
    key: &dyn Signer,
    parts: &[&[u8]],
) -> Option<(SigInfo<'b>, &'b [u8])> {
    let buf = region.alloc(key.max_sig_len())?;
    let len = key.sign(parts, buf)?;
    let sig_info = SigInfo {
        sig_type: key.sig_type(),
        key_locator: key.key_locator(),
        validity_period: None,
    };
    Some((sig_info, &buf[..len]))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSigner;

    impl Signer for NullSigner {
        fn sig_type(&self) -> u8 {
            crate::an::sig_type::NULL
        }
        fn key_locator(&self) -> Option<Name<'_>> {
            None
        }
        fn max_sig_len(&self) -> usize {
            0
        }
        fn sign(&self, _parts: &[&[u8]], _out: &mut [u8]) -> Option<usize> {
            Some(0)
        }
    }

    #[test]
    fn null_signer_produces_empty_signature() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let (sig_info, sig) = sign_parts(&region, &NullSigner, &[b"x"]).unwrap();
        assert_eq!(sig_info.sig_type, crate::an::sig_type::NULL);
        assert!(sig.is_empty());
    }

    #[test]
    fn sig_info_round_trips() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let mut enc = Encoder::new(&region).unwrap();
        let info = SigInfo {
            sig_type: crate::an::sig_type::SHA256,
            key_locator: None,
            validity_period: None,
        };
        info.encode_to(tt::D_SIG_INFO, &mut enc);
        let wire = enc.trim();
        let (tlv, _) = Tlv::read(wire).unwrap();
        let decoded = SigInfo::decode(&tlv, tt::D_SIG_INFO).unwrap();
        assert_eq!(decoded.sig_type, crate::an::sig_type::SHA256);
    }
}
