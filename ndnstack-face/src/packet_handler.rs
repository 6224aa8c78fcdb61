//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use ndnstack_region::Region;

use ndnstack_packet::{Data, Interest, Nack};

use crate::info::PacketInfo;

/// Sending and context-query operations a [`PacketHandler`] is offered
/// during dispatch, without needing to know which concrete [`crate::Transport`]
/// or which other handlers are installed on the owning `Face`.
pub trait FaceApi {
    /// Endpoint and PIT token of the packet currently being dispatched,
    /// if a `process_*` callback is executing.
    fn current_packet_info(&self) -> Option<PacketInfo>;

    /// Encodes `l3_bytes` (an already-encoded Interest, Data, or
    /// Nack-carrying Interest) into LP framing and sends it to
    /// `endpoint_id`, tagged with `pit_token`.
    fn send<'r>(&self, region: &'r Region<'r>, l3_bytes: &[u8], pit_token: u64, endpoint_id: u64) -> bool;

    /// Sends `l3_bytes` back to the endpoint and PIT token of the
    /// packet currently being dispatched.
    fn reply<'r>(&self, region: &'r Region<'r>, l3_bytes: &[u8]) -> bool {
        match self.current_packet_info() {
            Some(pi) => self.send(region, l3_bytes, pi.pit_token, pi.endpoint_id),
            None => false,
        }
    }
}

/// Receives packets from a [`crate::Face`], in priority order.
///
/// Every method defaults to declining the packet (`false`), so a
/// handler only needs to override the callbacks it cares about.
pub trait PacketHandler {
    /// Handles an inbound Interest. Returns `true` to claim it (no
    /// further handler sees it), `false` to pass it along.
    fn process_interest(&mut self, _face: &dyn FaceApi, _interest: &Interest<'_>) -> bool {
        false
    }

    /// Handles an inbound Data packet.
    fn process_data(&mut self, _face: &dyn FaceApi, _data: &Data<'_>) -> bool {
        false
    }

    /// Handles an inbound Nack.
    fn process_nack(&mut self, _face: &dyn FaceApi, _nack: &Nack<'_>) -> bool {
        false
    }

    /// Runs any per-tick maintenance, e.g. checking a stored deadline.
    fn loop_tick(&mut self, _face: &dyn FaceApi) {}
}
