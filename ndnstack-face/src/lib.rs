//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! Network-layer [`Face`]: a [`Transport`] plus a priority-ordered chain
//! of [`PacketHandler`]s, dispatching inbound Interest/Data/Nack packets
//! classified through [`ndnstack_lp`].

pub mod face;
pub mod info;
pub mod packet_handler;
pub mod transport;

pub use face::Face;
pub use info::PacketInfo;
pub use packet_handler::{FaceApi, PacketHandler};
pub use transport::Transport;
