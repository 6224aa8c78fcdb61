//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use sha2::{Digest as _, Sha256};
use subtle::ConstantTimeEq;

use ndnstack_packet::an::sig_type;
use ndnstack_packet::{Name, Signer, Verifier};

/// SHA-256 digest "signature": not a real signature, but lets a packet
/// carry a tamper-evident checksum without a secret key.
#[derive(Clone, Copy, Debug, Default)]
pub struct DigestKey;

impl DigestKey {
    pub const fn new() -> DigestKey {
        DigestKey
    }
}

impl Signer for DigestKey {
    fn sig_type(&self) -> u8 {
        sig_type::SHA256
    }

    fn key_locator(&self) -> Option<Name<'_>> {
        None
    }

    fn max_sig_len(&self) -> usize {
        32
    }

    fn sign(&self, parts: &[&[u8]], out: &mut [u8]) -> Option<usize> {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        let digest = hasher.finalize();
        out.get_mut(..32)?.copy_from_slice(&digest);
        Some(32)
    }
}

impl Verifier for DigestKey {
    fn verify(&self, parts: &[&[u8]], sig: &[u8]) -> bool {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        let digest = hasher.finalize();
        bool::from(digest.as_slice().ct_eq(sig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_and_verifies() {
        let key = DigestKey::new();
        let mut sig = [0u8; 32];
        let len = key.sign(&[b"hello"], &mut sig).unwrap();
        assert_eq!(len, 32);
        assert!(key.verify(&[b"hello"], &sig[..len]));
        assert!(!key.verify(&[b"other"], &sig[..len]));
    }
}
