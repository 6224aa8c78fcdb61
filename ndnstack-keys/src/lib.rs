//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! Concrete signing keys implementing [`ndnstack_packet::Signer`] and
//! [`ndnstack_packet::Verifier`]: SHA-256 digest, HMAC-SHA256, ECDSA
//! P-256, and the null signature used for testing.

pub mod digest;
pub mod ecdsa;
pub mod hmac;
pub mod null;

pub use digest::DigestKey;
pub use ecdsa::{EcdsaPrivateKey, EcdsaPublicKey};
pub use hmac::HmacKey;
pub use null::NullKey;
