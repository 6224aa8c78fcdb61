//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//


pub const VRRP_MIN_PKT_LENGTH: usize = 16;  // in bytes
pub const VRRP_MAX_PKT_LENGTH: usize = 80;  // in bytes
pub const VRRP_MAX_IP_COUNT: usize = 16;    // max number of IPs that can be supported

pub const IP_HDR_MIN_LENGTH: usize = 20;
pub const IP_HDR_MAX_LENGTH: usize = 24;