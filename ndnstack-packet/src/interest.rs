//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use rand::Rng;
use sha2::{Digest, Sha256};

use ndnstack_region::Region;
use ndnstack_tlv::{DecodeError, DecodeResult, Encoder, ElementDef, Tlv};

use crate::an::tt;
use crate::convention::DIGEST_LEN;
use crate::name::Name;
use crate::signing::{SigInfo, Signer, Verifier};

/// Default Interest lifetime, in milliseconds, used when not overridden.
pub const DEFAULT_LIFETIME: u16 = 4000;
/// Default HopLimit, applied when the field is absent.
pub const MAX_HOP_LIMIT: u8 = 0xFF;

/// An Interest packet.
///
/// Decoded and freshly-built interests share this representation;
/// `app_parameters`/`sig_info`/`sig_value`/`signed_portion` are only
/// populated on a decoded, parameterized Interest.
#[derive(Clone, Copy, Debug)]
pub struct Interest<'b> {
    pub name: Name<'b>,
    pub can_be_prefix: bool,
    pub must_be_fresh: bool,
    pub fw_hint: Option<Name<'b>>,
    pub nonce: u32,
    pub lifetime: u16,
    pub hop_limit: u8,
    pub app_parameters: Option<&'b [u8]>,
    pub sig_info: Option<SigInfo<'b>>,
    sig_value: Option<&'b [u8]>,
    /// Name prefix (without ParametersSha256DigestComponent) concatenated
    /// with AppParameters and ISigInfo, exactly as signed.
    signed_portion: Option<&'b [u8]>,
    /// AppParameters || ISigInfo || ISigValue, hashed into the
    /// ParametersSha256DigestComponent.
    all_params: Option<&'b [u8]>,
}

impl<'b> Interest<'b> {
    /// Builds a bare Interest for `name` with randomized nonce and
    /// default lifetime/hop limit.
    pub fn new(name: Name<'b>) -> Interest<'b> {
        Interest {
            name,
            can_be_prefix: false,
            must_be_fresh: false,
            fw_hint: None,
            nonce: rand::rng().random(),
            lifetime: DEFAULT_LIFETIME,
            hop_limit: MAX_HOP_LIMIT,
            app_parameters: None,
            sig_info: None,
            sig_value: None,
            signed_portion: None,
            all_params: None,
        }
    }

    fn find_params_digest(name: &Name<'_>) -> Option<usize> {
        name.iter()
            .position(|c| crate::convention::is_params_digest(&c))
    }

    fn encode_middle(&self, encoder: &mut Encoder<'_>) {
        if self.hop_limit != MAX_HOP_LIMIT {
            encoder.prepend_tlv(tt::HOP_LIMIT, false, |e| {
                ndnstack_tlv::nni::encode_fixed(e, self.hop_limit as u64, 1)
            });
        }
        if self.lifetime != DEFAULT_LIFETIME {
            encoder.prepend_tlv(tt::INTEREST_LIFETIME, false, |e| {
                ndnstack_tlv::nni::encode(e, self.lifetime as u64)
            });
        }
        encoder.prepend_tlv(tt::NONCE, false, |e| {
            e.prepend_bytes(&self.nonce.to_be_bytes());
        });
        if let Some(fw_hint) = &self.fw_hint {
            encoder.prepend_tlv(tt::FORWARDING_HINT, false, |e| fw_hint.encode_to(e));
        }
        if self.must_be_fresh {
            encoder.prepend_tlv(tt::MUST_BE_FRESH, false, |_| {});
        }
        if self.can_be_prefix {
            encoder.prepend_tlv(tt::CAN_BE_PREFIX, false, |_| {});
        }
    }

    /// Encodes this Interest without AppParameters or a signature.
    pub fn encode(&self, region: &'b Region<'b>) -> Option<&'b [u8]> {
        let mut enc = Encoder::new(region)?;
        enc.prepend_tlv(tt::INTEREST, false, |e| {
            self.encode_middle(e);
            self.name.encode_to(e);
        });
        if !enc.is_ok() {
            enc.discard();
            return None;
        }
        Some(enc.trim())
    }

    /// Signs `app_parameters` onto this Interest, producing the full
    /// NDN signed-Interest structure: a ParametersSha256DigestComponent
    /// appended to `name`, followed by AppParameters, ISigInfo, and
    /// ISigValue.
    pub fn encode_signed(
        &self,
        region: &'b Region<'b>,
        app_parameters: &[u8],
        key: &dyn Signer,
    ) -> Option<&'b [u8]> {
        let signed_name = match Self::find_params_digest(&self.name) {
            None => self.name,
            Some(pos) if pos == self.name.len() - 1 => self.name.prefix(-1)?,
            Some(_) => return None,
        };

        // Signed portion: signedName.value || AppParameters || ISigInfo
        // (without ISigValue, which does not exist yet).
        let presig = region.sub_region(region.available() / 2)?;
        let mut presig_enc = Encoder::new(&presig)?;
        let placeholder_info = SigInfo {
            sig_type: key.sig_type(),
            key_locator: key.key_locator(),
            validity_period: None,
        };
        placeholder_info.encode_to(tt::I_SIG_INFO, &mut presig_enc);
        presig_enc.prepend_tlv(tt::APP_PARAMETERS, false, |e| {
            e.prepend_bytes(app_parameters);
        });
        if !presig_enc.is_ok() {
            presig_enc.discard();
            return None;
        }
        let params_and_info = presig_enc.trim();

        let mut sig_buf = [0u8; 256];
        let sig_len = key.sign(
            &[signed_name.value(), params_and_info],
            &mut sig_buf,
        )?;
        let sig_value = region.alloc(sig_len)?;
        sig_value.copy_from_slice(&sig_buf[..sig_len]);

        // All params: AppParameters || ISigInfo || ISigValue, assembled
        // to compute the ParametersSha256DigestComponent.
        let all_params_region = region.sub_region(region.available() / 2)?;
        let mut all_enc = Encoder::new(&all_params_region)?;
        all_enc.prepend_tlv(tt::I_SIG_VALUE, false, |e| {
            e.prepend_bytes(sig_value);
        });
        all_enc.prepend_bytes(params_and_info);
        if !all_enc.is_ok() {
            all_enc.discard();
            return None;
        }
        let all_params = all_enc.trim();

        let digest: [u8; DIGEST_LEN] = Sha256::digest(all_params).into();
        let digest_comp = crate::convention::build_params_digest(region, &digest)?;
        let final_name = signed_name.append(region, &[digest_comp])?;

        let mut enc = Encoder::new(region)?;
        enc.prepend_tlv(tt::INTEREST, false, |e| {
            e.prepend_bytes(all_params);
            self.encode_middle(e);
            final_name.encode_to(e);
        });
        if !enc.is_ok() {
            enc.discard();
            return None;
        }
        Some(enc.trim())
    }

    /// Decodes an Interest or Nack-header-carried Interest.
    pub fn decode(tlv: &Tlv<'b>) -> DecodeResult<Interest<'b>> {
        Self::decode_as(tlv, tt::INTEREST)
    }

    pub(crate) fn decode_as(tlv: &Tlv<'b>, top_type: u32) -> DecodeResult<Interest<'b>> {
        let mut name = None;
        let mut can_be_prefix = false;
        let mut must_be_fresh = false;
        let mut fw_hint = None;
        let mut nonce = 0u32;
        let mut lifetime = DEFAULT_LIFETIME;
        let mut hop_limit = MAX_HOP_LIMIT;
        let mut app_parameters = None;
        let mut sig_info = None;
        let mut sig_value = None;
        let mut signed_portion = None;
        let mut all_params_start: Option<usize> = None;
        let base = tlv.value.as_ptr() as usize;
        let offset_of = |s: &[u8]| s.as_ptr() as usize - base;

        ndnstack_tlv::ev_decoder::decode(
            tlv,
            &[top_type],
            vec![
                ElementDef::fallible(tt::NAME, |d| {
                    name = Name::from_tlv(d).ok();
                    name.is_some()
                })
                .with_order(0),
                ElementDef::new(tt::CAN_BE_PREFIX, |_| can_be_prefix = true).with_order(100),
                ElementDef::new(tt::MUST_BE_FRESH, |_| must_be_fresh = true).with_order(200),
                ElementDef::fallible(tt::FORWARDING_HINT, |d| {
                    fw_hint = Name::from_tlv(d).ok();
                    fw_hint.is_some()
                })
                .with_order(300),
                ElementDef::new(tt::NONCE, |d| {
                    if d.value.len() == 4 {
                        nonce = u32::from_be_bytes(d.value.try_into().unwrap());
                    }
                })
                .with_order(400),
                ElementDef::fallible(tt::INTEREST_LIFETIME, |d| {
                    match ndnstack_tlv::nni::decode(d, u64::MAX) {
                        Ok(v) => {
                            lifetime = v as u16;
                            true
                        }
                        Err(_) => false,
                    }
                })
                .with_order(500),
                ElementDef::fallible(tt::HOP_LIMIT, |d| {
                    match ndnstack_tlv::nni::decode(d, u8::MAX as u64) {
                        Ok(v) => {
                            hop_limit = v as u8;
                            true
                        }
                        Err(_) => false,
                    }
                })
                .with_order(600),
                ElementDef::new(tt::APP_PARAMETERS, |d| {
                    app_parameters = Some(d.value);
                    all_params_start = Some(offset_of(d.tlv));
                })
                .with_order(700),
                ElementDef::fallible(tt::I_SIG_INFO, |d| {
                    sig_info = SigInfo::decode(d, tt::I_SIG_INFO).ok();
                    sig_info.is_some()
                })
                .with_order(800),
                ElementDef::new(tt::I_SIG_VALUE, |d| {
                    sig_value = Some(d.value);
                    if let Some(start) = all_params_start {
                        signed_portion = Some(&tlv.value[start..offset_of(d.tlv)]);
                    }
                })
                .with_order(900),
            ],
        )?;

        let name = name.ok_or(DecodeError::UnexpectedTopType(top_type))?;
        let all_params = all_params_start.map(|start| &tlv.value[start..]);

        Ok(Interest {
            name,
            can_be_prefix,
            must_be_fresh,
            fw_hint,
            nonce,
            lifetime,
            hop_limit,
            app_parameters,
            sig_info,
            sig_value,
            signed_portion,
            all_params,
        })
    }

    /// Checks the ParametersSha256DigestComponent against AppParameters,
    /// ISigInfo, and ISigValue. Only meaningful on a decoded Interest.
    pub fn check_digest(&self) -> bool {
        let Some(all_params) = self.all_params else {
            return false;
        };
        let Some(pos) = Self::find_params_digest(&self.name) else {
            return false;
        };
        let comp = self.name.get(pos as i64).unwrap();
        let digest: [u8; DIGEST_LEN] = Sha256::digest(all_params).into();
        bool::from(subtle::ConstantTimeEq::ct_eq(&digest[..], comp.value()))
    }

    /// Verifies the signature with `key`. Only meaningful on a decoded,
    /// parameterized Interest.
    pub fn verify(&self, key: &dyn Verifier) -> bool {
        if !self.check_digest() {
            return false;
        }
        let (Some(signed_portion), Some(sig_value)) = (self.signed_portion, self.sig_value) else {
            return false;
        };
        let Some(pos) = Self::find_params_digest(&self.name) else {
            return false;
        };
        if pos != self.name.len() - 1 {
            return false;
        }
        let Some(signed_name) = self.name.prefix(-1) else {
            return false;
        };
        key.verify(&[signed_name.value(), signed_portion], sig_value)
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

    #[test]
    fn encodes_bare_interest() {
        let mut storage = [0u8; 256];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let interest = Interest::new(name);
        let wire = interest.encode(&region).unwrap();
        let (tlv, _) = Tlv::read(wire).unwrap();
        assert_eq!(tlv.tlv_type, tt::INTEREST);
    }

    #[test]
    fn round_trips_through_decode() {
        let mut storage = [0u8; 256];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let mut interest = Interest::new(name);
        interest.can_be_prefix = true;
        interest.must_be_fresh = true;
        let wire = interest.encode(&region).unwrap();
        let (tlv, _) = Tlv::read(wire).unwrap();
        let decoded = Interest::decode(&tlv).unwrap();
        assert!(decoded.can_be_prefix);
        assert!(decoded.must_be_fresh);
        assert_eq!(decoded.nonce, interest.nonce);
    }

    #[test]
    fn signs_and_verifies_with_null_key() {
        let mut storage = [0u8; 1024];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let interest = Interest::new(name);
        let wire = interest
            .encode_signed(&region, b"params", &NullSigner)
            .unwrap();
        let (tlv, _) = Tlv::read(wire).unwrap();
        let decoded = Interest::decode(&tlv).unwrap();
        assert!(decoded.check_digest());
        struct NullVerifier;
        impl Verifier for NullVerifier {
            fn verify(&self, _parts: &[&[u8]], sig: &[u8]) -> bool {
                sig.is_empty()
            }
        }
        assert!(decoded.verify(&NullVerifier));
    }
}
