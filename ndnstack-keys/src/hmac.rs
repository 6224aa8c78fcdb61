//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use ndnstack_packet::an::sig_type;
use ndnstack_packet::{Name, Signer, Verifier};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 secret key.
///
/// The key locator, if set, records the KeyLocator Name's encoded
/// TLV-VALUE so `key_locator()` can hand out a borrowed [`Name`] without
/// an external region.
pub struct HmacKey {
    secret: Vec<u8>,
    key_locator: Option<Vec<u8>>,
}

impl HmacKey {
    /// Imports raw secret key bits.
    pub fn import(secret: &[u8]) -> HmacKey {
        HmacKey {
            secret: secret.to_vec(),
            key_locator: None,
        }
    }

    /// Sets the KeyLocator Name recorded in SigInfo, from an already
    /// TLV-encoded Name value.
    pub fn with_key_locator(mut self, name_value: &[u8]) -> HmacKey {
        self.key_locator = Some(name_value.to_vec());
        self
    }

    fn mac(&self) -> Option<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret).ok()
    }
}

impl Signer for HmacKey {
    fn sig_type(&self) -> u8 {
        sig_type::HMAC_WITH_SHA256
    }

    fn key_locator(&self) -> Option<Name<'_>> {
        let value = self.key_locator.as_deref()?;
        Name::from_value(value).ok()
    }

    fn max_sig_len(&self) -> usize {
        32
    }

    fn sign(&self, parts: &[&[u8]], out: &mut [u8]) -> Option<usize> {
        let mut mac = self.mac()?;
        for part in parts {
            mac.update(part);
        }
        let tag = mac.finalize().into_bytes();
        out.get_mut(..32)?.copy_from_slice(&tag);
        Some(32)
    }
}

impl Verifier for HmacKey {
    fn verify(&self, parts: &[&[u8]], sig: &[u8]) -> bool {
        let Some(mut mac) = self.mac() else {
            return false;
        };
        for part in parts {
            mac.update(part);
        }
        let tag = mac.finalize().into_bytes();
        bool::from(tag.as_slice().ct_eq(sig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_and_verifies() {
        let key = HmacKey::import(b"shared secret");
        let mut sig = [0u8; 32];
        let len = key.sign(&[b"hello"], &mut sig).unwrap();
        assert!(key.verify(&[b"hello"], &sig[..len]));
        assert!(!key.verify(&[b"tampered"], &sig[..len]));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let key_a = HmacKey::import(b"secret a");
        let key_b = HmacKey::import(b"secret b");
        let mut sig = [0u8; 32];
        let len = key_a.sign(&[b"hello"], &mut sig).unwrap();
        assert!(!key_b.verify(&[b"hello"], &sig[..len]));
    }
}
