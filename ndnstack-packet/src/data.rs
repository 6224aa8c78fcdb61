//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use sha2::{Digest, Sha256};

use ndnstack_region::Region;
use ndnstack_tlv::{DecodeError, DecodeResult, Encoder, ElementDef, Tlv};

use crate::an::{content_type, tt};
use crate::convention::DIGEST_LEN;
use crate::name::Name;
use crate::signing::{SigInfo, Signer, Verifier};

/// A Data packet.
#[derive(Clone, Copy, Debug)]
pub struct Data<'b> {
    pub name: Name<'b>,
    pub content_type: u8,
    pub freshness_period: u32,
    pub is_final_block: bool,
    pub content: &'b [u8],
    pub sig_info: Option<SigInfo<'b>>,
    sig_value: Option<&'b [u8]>,
    signed_portion: Option<&'b [u8]>,
    whole_packet: Option<&'b [u8]>,
}

impl<'b> Data<'b> {
    /// Builds a Data packet with default MetaInfo fields and no content.
    pub fn new(name: Name<'b>) -> Data<'b> {
        Data {
            name,
            content_type: content_type::BLOB,
            freshness_period: 0,
            is_final_block: false,
            content: &[],
            sig_info: None,
            sig_value: None,
            signed_portion: None,
            whole_packet: None,
        }
    }

    fn encode_signed_portion(&self, encoder: &mut Encoder<'_>) {
        encoder.prepend_tlv(tt::CONTENT, true, |e| {
            e.prepend_bytes(self.content);
        });
        encoder.prepend_tlv(tt::META_INFO, true, |e| {
            if self.is_final_block {
                if let Some(last) = self.name.get(-1) {
                    e.prepend_bytes(last.tlv());
                    let len = last.tlv().len();
                    e.prepend_type_length(tt::FINAL_BLOCK, len);
                }
            }
            if self.freshness_period != 0 {
                e.prepend_tlv(tt::FRESHNESS_PERIOD, false, |e| {
                    ndnstack_tlv::nni::encode(e, self.freshness_period as u64)
                });
            }
            if self.content_type != content_type::BLOB {
                e.prepend_tlv(tt::CONTENT_TYPE, false, |e| {
                    ndnstack_tlv::nni::encode(e, self.content_type as u64)
                });
            }
        });
        self.name.encode_to(encoder);
    }

    /// Signs this Data packet with `key`.
    pub fn encode_signed(&self, region: &'b Region<'b>, key: &dyn Signer) -> Option<&'b [u8]> {
        self.encode_signed_with_validity(region, key, None)
    }

    /// Signs this Data packet with `key`, recording a ValidityPeriod
    /// extension in DSigInfo. Used to issue certificates.
    pub fn encode_signed_with_validity(
        &self,
        region: &'b Region<'b>,
        key: &dyn Signer,
        validity_period: Option<(u64, u64)>,
    ) -> Option<&'b [u8]> {
        let portion_region = region.sub_region(region.available() / 2)?;
        let mut portion_enc = Encoder::new(&portion_region)?;
        self.encode_signed_portion(&mut portion_enc);
        if !portion_enc.is_ok() {
            portion_enc.discard();
            return None;
        }
        let signed_portion = portion_enc.trim();

        let mut sig_buf = [0u8; 256];
        let sig_len = key.sign(&[signed_portion], &mut sig_buf)?;
        let sig_value = region.alloc(sig_len)?;
        sig_value.copy_from_slice(&sig_buf[..sig_len]);
        let sig_info = SigInfo {
            sig_type: key.sig_type(),
            key_locator: key.key_locator(),
            validity_period,
        };

        let mut enc = Encoder::new(region)?;
        enc.prepend_tlv(tt::DATA, false, |e| {
            e.prepend_tlv(tt::D_SIG_VALUE, false, |e| {
                e.prepend_bytes(sig_value);
            });
            sig_info.encode_to(tt::D_SIG_INFO, e);
            e.prepend_bytes(signed_portion);
        });
        if !enc.is_ok() {
            enc.discard();
            return None;
        }
        Some(enc.trim())
    }

    /// Decodes a Data packet, retaining the whole encoded packet (so it
    /// can be forwarded byte-for-byte) and the signed portion (for
    /// `verify`/`full_name`).
    pub fn decode(tlv: &Tlv<'b>) -> DecodeResult<Data<'b>> {
        let mut name = None;
        let mut content_type = content_type::BLOB;
        let mut freshness_period = 0u32;
        let mut is_final_block = false;
        let mut final_block_raw: Option<&[u8]> = None;
        let mut content: &[u8] = &[];
        let mut sig_info = None;
        let mut sig_value = None;
        let mut signed_portion = None;

        ndnstack_tlv::ev_decoder::decode(
            tlv,
            &[tt::DATA],
            vec![
                ElementDef::fallible(tt::NAME, |d| {
                    name = Name::from_tlv(d).ok();
                    name.is_some()
                })
                .with_order(0),
                ElementDef::fallible(tt::META_INFO, |d| {
                    ndnstack_tlv::ev_decoder::decode_value(
                        d.decoder(),
                        vec![
                            ElementDef::fallible(tt::CONTENT_TYPE, |d| {
                                match ndnstack_tlv::nni::decode(d, u64::MAX) {
                                    Ok(v) => {
                                        content_type = v as u8;
                                        true
                                    }
                                    Err(_) => false,
                                }
                            })
                            .with_order(0),
                            ElementDef::fallible(tt::FRESHNESS_PERIOD, |d| {
                                match ndnstack_tlv::nni::decode(d, u32::MAX as u64) {
                                    Ok(v) => {
                                        freshness_period = v as u32;
                                        true
                                    }
                                    Err(_) => false,
                                }
                            })
                            .with_order(100),
                            ElementDef::new(tt::FINAL_BLOCK, |d| {
                                final_block_raw = Some(d.value);
                            })
                            .with_order(200),
                        ],
                    )
                    .is_ok()
                })
                .with_order(100),
                ElementDef::new(tt::CONTENT, |d| content = d.value).with_order(200),
                ElementDef::fallible(tt::D_SIG_INFO, |d| {
                    sig_info = SigInfo::decode(d, tt::D_SIG_INFO).ok();
                    sig_info.is_some()
                })
                .with_order(300),
                ElementDef::new(tt::D_SIG_VALUE, |d| {
                    sig_value = Some(d.value);
                    signed_portion = Some(&tlv.value[..(d.tlv.as_ptr() as usize
                        - tlv.value.as_ptr() as usize)]);
                })
                .with_order(400),
            ],
        )?;

        let name = name.ok_or(DecodeError::UnexpectedTopType(tt::DATA))?;
        if let Some(raw) = final_block_raw {
            if let Some(last) = name.get(-1) {
                is_final_block = raw == last.value();
            }
        }

        Ok(Data {
            name,
            content_type,
            freshness_period,
            is_final_block,
            content,
            sig_info,
            sig_value,
            signed_portion,
            whole_packet: Some(tlv.tlv),
        })
    }

    /// Verifies this Data's signature with `key`. Only meaningful on a
    /// decoded packet.
    pub fn verify(&self, key: &dyn Verifier) -> bool {
        let (Some(portion), Some(sig)) = (self.signed_portion, self.sig_value) else {
            return false;
        };
        key.verify(&[portion], sig)
    }

    /// Computes the implicit SHA-256 digest of the whole encoded packet.
    /// Only meaningful on a decoded packet.
    pub fn compute_implicit_digest(&self) -> Option<[u8; DIGEST_LEN]> {
        let whole = self.whole_packet?;
        Some(Sha256::digest(whole).into())
    }

    /// The full name (name plus ImplicitSha256DigestComponent).
    pub fn full_name(&self, region: &'b Region<'b>) -> Option<Name<'b>> {
        let digest = self.compute_implicit_digest()?;
        let comp = crate::convention::build_implicit_digest(region, &digest)?;
        self.name.append(region, &[comp])
    }
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

    struct NullVerifier;
    impl Verifier for NullVerifier {
        fn verify(&self, _parts: &[&[u8]], sig: &[u8]) -> bool {
            sig.is_empty()
        }
    }

    #[test]
    fn signs_and_decodes_data() {
        let mut storage = [0u8; 512];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let mut data = Data::new(name);
        data.content = b"hello";
        let wire = data.encode_signed(&region, &NullSigner).unwrap();
        let (tlv, _) = Tlv::read(wire).unwrap();
        let decoded = Data::decode(&tlv).unwrap();
        assert_eq!(decoded.content, b"hello");
        assert!(decoded.verify(&NullVerifier));
    }

    #[test]
    fn computes_implicit_digest() {
        let mut storage = [0u8; 512];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let data = Data::new(name);
        let wire = data.encode_signed(&region, &NullSigner).unwrap();
        let (tlv, _) = Tlv::read(wire).unwrap();
        let decoded = Data::decode(&tlv).unwrap();
        let full_name = decoded.full_name(&region).unwrap();
        assert_eq!(full_name.len(), 2);
    }
}
