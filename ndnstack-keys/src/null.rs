//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use ndnstack_packet::an::sig_type;
use ndnstack_packet::{Name, Signer, Verifier};

/// The null signature: packets are not signed, and any signature type
/// verifies. Intended for testing and experimentation only.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullKey;

impl NullKey {
    pub const fn new() -> NullKey {
        NullKey
    }
}

impl Signer for NullKey {
    fn sig_type(&self) -> u8 {
        sig_type::NULL
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

impl Verifier for NullKey {
    fn verify(&self, _parts: &[&[u8]], _sig: &[u8]) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_anything() {
        let key = NullKey::new();
        assert!(key.verify(&[b"anything"], b"garbage"));
    }
}
