//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

pub mod debug;
pub mod error;
pub mod events;
pub mod instance;
pub mod northbound;
pub mod tasks;
pub mod version;
