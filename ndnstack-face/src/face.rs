//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use std::cell::{Cell, RefCell};

use ndnstack_region::Region;
use ndnstack_tlv::Tlv;

use ndnstack_lp::{classify, Classified, Fragmenter, PitToken};

use crate::info::PacketInfo;
use crate::packet_handler::{FaceApi, PacketHandler};
use crate::transport::Transport;

/// State shared between `Face::loop_tick`'s dispatch loop and the
/// handlers it calls: the transport (behind a `RefCell` so `send`/
/// `reply` can be called while handlers are being iterated) and the
/// context of whichever packet is currently being dispatched.
struct Shared<T: Transport> {
    transport: RefCell<T>,
    fragmenter: Fragmenter,
    current: Cell<Option<PacketInfo>>,
}

impl<T: Transport> FaceApi for Shared<T> {
    fn current_packet_info(&self) -> Option<PacketInfo> {
        self.current.get()
    }

    fn send<'r>(&self, region: &'r Region<'r>, l3_bytes: &[u8], pit_token: u64, endpoint_id: u64) -> bool {
        let Some(fragments) =
            self.fragmenter
                .fragment(region, l3_bytes, PitToken::from8(pit_token), None)
        else {
            return false;
        };
        let mut transport = self.transport.borrow_mut();
        let mut ok = true;
        for frame in fragments {
            ok &= transport.send(frame, endpoint_id);
        }
        ok
    }
}

/// A network-layer face: a [`Transport`] plus a priority-ordered chain
/// of [`PacketHandler`]s.
///
/// `loop_tick` must be called periodically (or driven by an external
/// reactor) to poll the transport and dispatch whatever arrived.
/// Scheduling is single-threaded and cooperative: no handler method
/// blocks, and a handler that needs to wait for something represents
/// that as a stored deadline checked from its `loop_tick` override.
pub struct Face<T: Transport> {
    shared: Shared<T>,
    handlers: Vec<(i8, Box<dyn PacketHandler>)>,
}

impl<T: Transport> Face<T> {
    pub fn new(transport: T, mtu: usize) -> Face<T> {
        Face {
            shared: Shared {
                transport: RefCell::new(transport),
                fragmenter: Fragmenter::new(mtu),
                current: Cell::new(None),
            },
            handlers: Vec::new(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.shared.transport.borrow().is_up()
    }

    /// Registers a handler at the given priority (smaller runs first).
    /// Handlers of equal priority run in registration order.
    pub fn add_handler(&mut self, prio: i8, handler: Box<dyn PacketHandler>) {
        let pos = self
            .handlers
            .iter()
            .position(|(p, _)| *p > prio)
            .unwrap_or(self.handlers.len());
        self.handlers.insert(pos, (prio, handler));
    }

    /// Encodes and sends `l3_bytes` (an Interest, Data, or
    /// Nack-carrying Interest already encoded into `region`) to
    /// `endpoint_id`, tagged with `pit_token`.
    pub fn send<'r>(&self, region: &'r Region<'r>, l3_bytes: &[u8], pit_token: u64, endpoint_id: u64) -> bool {
        self.shared.send(region, l3_bytes, pit_token, endpoint_id)
    }

    /// Polls the transport and dispatches every frame it has ready,
    /// then runs every handler's per-tick maintenance.
    ///
    /// `rx_buf` is a caller-owned buffer reused across every dispatched
    /// frame in this tick; this is a simplification of the fixed-size
    /// ring of receive buffers a constrained implementation would use,
    /// appropriate since no handler may retain a reference past the
    /// `process_*` call that received it. Decoding is zero-copy and
    /// needs no separate scratch region; a handler allocates its own
    /// `Region` if it needs to build a reply.
    pub fn loop_tick(&mut self, rx_buf: &mut [u8]) {
        self.shared.transport.borrow_mut().loop_tick();
        loop {
            let received = self.shared.transport.borrow_mut().poll_recv(rx_buf);
            let Some((len, endpoint_id)) = received else {
                break;
            };
            self.dispatch(&rx_buf[..len], endpoint_id);
        }
        for (_, handler) in self.handlers.iter_mut() {
            handler.loop_tick(&self.shared);
        }
    }

    fn dispatch(&mut self, bytes: &[u8], endpoint_id: u64) {
        let Ok((tlv, _)) = Tlv::read(bytes) else {
            tracing::debug!(endpoint_id, "dropping malformed frame");
            return;
        };
        let classified = match classify(&tlv) {
            Ok(c) => c,
            Err(err) => {
                tracing::debug!(endpoint_id, %err, "dropping unclassifiable frame");
                return;
            }
        };

        let pit_token = match &classified {
            Classified::Fragment { l3, .. }
            | Classified::Interest { l3, .. }
            | Classified::Data { l3, .. }
            | Classified::Nack { l3, .. } => l3.pit_token.to8(),
        };
        self.shared.current.set(Some(PacketInfo {
            endpoint_id,
            pit_token,
        }));

        match classified {
            Classified::Fragment { .. } => {
                // A bare Face does not reassemble; a handler that needs
                // fragmented transport support wraps one in a
                // reassembling adapter above this layer.
                tracing::debug!(endpoint_id, "dropping unreassembled fragment");
            }
            Classified::Interest { interest, .. } => {
                for (_, handler) in self.handlers.iter_mut() {
                    if handler.process_interest(&self.shared, &interest) {
                        break;
                    }
                }
            }
            Classified::Data { data, .. } => {
                for (_, handler) in self.handlers.iter_mut() {
                    if handler.process_data(&self.shared, &data) {
                        break;
                    }
                }
            }
            Classified::Nack { nack, .. } => {
                for (_, handler) in self.handlers.iter_mut() {
                    if handler.process_nack(&self.shared, &nack) {
                        break;
                    }
                }
            }
        }

        self.shared.current.set(None);
    }
}

#[cfg(test)]
mod tests {
    use ndnstack_packet::{Interest, Name};

    use super::*;

    struct LoopbackTransport {
        inbox: Vec<(u64, Vec<u8>)>,
        sent: Vec<(u64, Vec<u8>)>,
    }

    impl Transport for LoopbackTransport {
        fn is_up(&self) -> bool {
            true
        }

        fn poll_recv(&mut self, buf: &mut [u8]) -> Option<(usize, u64)> {
            let (endpoint_id, frame) = self.inbox.pop()?;
            buf[..frame.len()].copy_from_slice(&frame);
            Some((frame.len(), endpoint_id))
        }

        fn send(&mut self, buf: &[u8], endpoint_id: u64) -> bool {
            self.sent.push((endpoint_id, buf.to_vec()));
            true
        }
    }

    struct EchoHandler;

    impl PacketHandler for EchoHandler {
        fn process_interest(&mut self, face: &dyn FaceApi, interest: &Interest<'_>) -> bool {
            let mut storage = [0u8; 256];
            let region = Region::new(&mut storage);
            let wire = interest.encode(&region).unwrap();
            face.reply(&region, wire);
            true
        }
    }

    #[test]
    fn dispatches_interest_to_handler_and_replies() {
        let mut storage = [0u8; 256];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let interest = Interest::new(name);
        let wire = interest.encode(&region).unwrap().to_vec();

        let transport = LoopbackTransport {
            inbox: vec![(7, wire)],
            sent: Vec::new(),
        };
        let mut face = Face::new(transport, 1500);
        face.add_handler(0, Box::new(EchoHandler));

        let mut rx_buf = [0u8; 1500];
        face.loop_tick(&mut rx_buf);

        let sent = &face.shared.transport.borrow().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 7);
    }
}
