//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

/// Endpoint and PIT token context for one packet flowing through a
/// [`crate::Face`].
///
/// The PIT token is carried as a plain `u64` here (rather than the
/// variable-length [`ndnstack_lp::PitToken`] used on the wire) since
/// handlers only ever need to echo it back verbatim; `PitToken::to8`/
/// `from8` convert between the two at the LP boundary.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PacketInfo {
    pub endpoint_id: u64,
    pub pit_token: u64,
}
