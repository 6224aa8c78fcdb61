//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! NDNLPv2 link-layer framing: PIT tokens, fragmentation, and
//! reassembly, layered in front of the Interest/Data/Nack packets in
//! [`ndnstack_packet`].

pub mod classify;
pub mod fragment;
pub mod pit_token;
pub mod reassembler;

pub use classify::{classify, Classified, L3Header};
pub use fragment::{FragmentHeader, Fragmenter};
pub use pit_token::PitToken;
pub use reassembler::{concat_parts, Reassembler};
