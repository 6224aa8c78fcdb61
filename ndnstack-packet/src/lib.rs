//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! NDN Packet Format v0.3 types: names and their typed conventions,
//! Interest and Data packets, Nack headers, and the signature fields
//! ([`signing::SigInfo`]) shared by Interest and Data.
//!
//! Signing and verification are generic over the [`signing::Signer`] and
//! [`signing::Verifier`] traits; concrete keys live in `ndnstack-keys`.

pub mod an;
pub mod component;
pub mod convention;
pub mod data;
pub mod interest;
pub mod nack;
pub mod name;
pub mod signing;

pub use component::Component;
pub use data::Data;
pub use interest::Interest;
pub use nack::Nack;
pub use name::{Name, NameCompare};
pub use signing::{SigInfo, Signer, Verifier};
