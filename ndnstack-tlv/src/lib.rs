//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! TLV codec: VAR-NUMBER primitives, a forward-iterating [`Decoder`], a
//! back-to-front [`Encoder`] over a [`ndnstack_region::Region`], and the
//! evolvability-aware [`EvDecoder`] dispatcher used by every packet type
//! built on top of this crate.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod ev_decoder;
pub mod nni;
pub mod varnum;

pub use decoder::{Decoder, Tlv};
pub use encoder::Encoder;
pub use error::{DecodeError, DecodeResult};
pub use ev_decoder::ElementDef;
