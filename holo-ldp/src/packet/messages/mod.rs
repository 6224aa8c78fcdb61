//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod address;
pub mod capability;
pub mod hello;
pub mod initialization;
pub mod keepalive;
pub mod label;
pub mod notification;

pub use address::*;
pub use capability::*;
pub use hello::*;
pub use initialization::*;
pub use keepalive::*;
pub use label::*;
pub use notification::*;
