//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod client;
mod core;
mod db;
mod error;

pub use self::core::Northbound;
pub use self::error::{Error, Result};
