//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! NDNCERT v0.3 certificate issuance: CA profile packets, ECDH+HKDF
//! session key derivation, and the encrypted NEW/CHALLENGE exchange
//! that turns a self-signed certificate request into a CA-issued
//! certificate.
//!
//! [`client::Client`] drives the requester side of a session;
//! [`server::Server`] drives the issuer side. Both share the
//! [`common::SessionKey`]/[`common::EncryptedFrame`] codec and the
//! assigned numbers in [`an`].

pub mod an;
pub mod cert;
pub mod client;
pub mod common;
pub mod server;

pub use client::{CaProfile, Client};
pub use common::{EncryptedFrame, Role, SessionKey};
pub use server::Server;
