//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use rand::Rng;

use ndnstack_region::Region;
use ndnstack_tlv::Encoder;

use ndnstack_packet::an::tt;

use crate::pit_token::PitToken;

/// Sequence number, fragment index, and fragment count carried by a
/// fragmented LpPacket.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FragmentHeader {
    pub seq_num: u64,
    pub frag_index: u8,
    pub frag_count: u8,
}

impl FragmentHeader {
    /// The sequence number of fragment 0 of this fragment's run, used to
    /// key reassembly state.
    pub fn seq_num_base(&self) -> u64 {
        self.seq_num - self.frag_index as u64
    }

    fn encode_to(&self, encoder: &mut Encoder<'_>) {
        if self.frag_count <= 1 {
            return;
        }
        encoder.prepend_tlv(tt::FRAG_COUNT, false, |e| {
            ndnstack_tlv::nni::encode(e, self.frag_count as u64)
        });
        encoder.prepend_tlv(tt::FRAG_INDEX, false, |e| {
            ndnstack_tlv::nni::encode(e, self.frag_index as u64)
        });
        encoder.prepend_tlv(tt::LP_SEQ_NUM, false, |e| {
            ndnstack_tlv::nni::encode_fixed(e, self.seq_num, 8)
        });
    }
}

/// Fixed overhead budgeted for LP header fields on every fragment:
/// LpSeqNum (10) + FragIndex (3) + FragCount (3) + LpPayload TLV header
/// (5, generous for a 2-byte length) + outer LpPacket TLV header (5).
const FRAGMENT_OVERHEAD: usize = 10 + 3 + 3 + 5 + 5;

/// Splits an encoded L3 payload (an Interest, Data, or Nack-carrying
/// Interest) into one or more MTU-sized LpPacket fragments.
///
/// The first fragment alone carries the PIT token and Nack header, per
/// NDNLPv2; later fragments only carry the bare sequencing fields needed
/// for reassembly.
pub struct Fragmenter {
    mtu: usize,
}

impl Fragmenter {
    pub fn new(mtu: usize) -> Fragmenter {
        Fragmenter { mtu }
    }

    /// Encodes `payload` as one or more wire-ready LP fragments.
    ///
    /// Returns `None` if `mtu` is too small to make progress, or if more
    /// than 255 fragments would be required.
    pub fn fragment<'b>(
        &self,
        region: &'b Region<'b>,
        payload: &[u8],
        pit_token: PitToken,
        nack_header: Option<&[u8]>,
    ) -> Option<Vec<&'b [u8]>> {
        let first_extra = pit_token_overhead(pit_token) + nack_header.map_or(0, |n| n.len() + 5);

        if payload.len() + FRAGMENT_OVERHEAD + first_extra <= self.mtu
            && (pit_token.is_empty() && nack_header.is_none())
        {
            // No LP header fields needed at all: send the bare payload.
            return Some(vec![payload_to_region(region, payload)?]);
        }

        let first_room = self.mtu.checked_sub(FRAGMENT_OVERHEAD + first_extra)?;
        let later_room = self.mtu.checked_sub(FRAGMENT_OVERHEAD)?;
        if first_room == 0 || (payload.len() > first_room && later_room == 0) {
            return None;
        }

        if payload.len() <= first_room {
            return Some(vec![self.encode_fragment(
                region,
                FragmentHeader {
                    seq_num: 0,
                    frag_index: 0,
                    frag_count: 1,
                },
                pit_token,
                nack_header,
                payload,
            )?]);
        }

        let remaining = payload.len() - first_room;
        let frag_count = 1 + remaining.div_ceil(later_room);
        if frag_count > u8::MAX as usize {
            return None;
        }

        let seq_num_base: u64 = rand::rng().random();
        let mut fragments = Vec::with_capacity(frag_count);
        let mut offset = 0;
        for index in 0..frag_count {
            let room = if index == 0 { first_room } else { later_room };
            let end = (offset + room).min(payload.len());
            let chunk = &payload[offset..end];
            let header = FragmentHeader {
                seq_num: seq_num_base + index as u64,
                frag_index: index as u8,
                frag_count: frag_count as u8,
            };
            let (token, nack) = if index == 0 {
                (pit_token, nack_header)
            } else {
                (PitToken::empty(), None)
            };
            fragments.push(self.encode_fragment(region, header, token, nack, chunk)?);
            offset = end;
        }
        Some(fragments)
    }

    fn encode_fragment<'b>(
        &self,
        region: &'b Region<'b>,
        header: FragmentHeader,
        pit_token: PitToken,
        nack_header: Option<&[u8]>,
        chunk: &[u8],
    ) -> Option<&'b [u8]> {
        let mut enc = Encoder::new(region)?;
        enc.prepend_tlv(tt::LP_PACKET, false, |e| {
            e.prepend_tlv(tt::LP_PAYLOAD, true, |e| {
                e.prepend_bytes(chunk);
            });
            if let Some(nack) = nack_header {
                e.prepend_bytes(nack);
            }
            if !pit_token.is_empty() {
                e.prepend_tlv(tt::PIT_TOKEN, false, |e| {
                    e.prepend_bytes(pit_token.as_bytes());
                });
            }
            header.encode_to(e);
        });
        if !enc.is_ok() {
            enc.discard();
            return None;
        }
        Some(enc.trim())
    }
}

fn pit_token_overhead(pit_token: PitToken) -> usize {
    if pit_token.is_empty() {
        0
    } else {
        pit_token.as_bytes().len() + 2
    }
}

fn payload_to_region<'b>(region: &'b Region<'b>, payload: &[u8]) -> Option<&'b [u8]> {
    let buf = region.alloc(payload.len())?;
    buf.copy_from_slice(payload);
    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_payload_skipped_when_no_headers_needed() {
        let mut storage = [0u8; 256];
        let region = Region::new(&mut storage);
        let fragmenter = Fragmenter::new(1500);
        let fragments = fragmenter
            .fragment(&region, b"hello", PitToken::empty(), None)
            .unwrap();
        assert_eq!(fragments, vec![b"hello".as_slice()]);
    }

    #[test]
    fn wraps_single_fragment_with_pit_token() {
        let mut storage = [0u8; 256];
        let region = Region::new(&mut storage);
        let fragmenter = Fragmenter::new(1500);
        let fragments = fragmenter
            .fragment(&region, b"hello", PitToken::from4(7), None)
            .unwrap();
        assert_eq!(fragments.len(), 1);
        let (tlv, _) = ndnstack_tlv::Tlv::read(fragments[0]).unwrap();
        assert_eq!(tlv.tlv_type, tt::LP_PACKET);
    }

    #[test]
    fn splits_oversized_payload_into_multiple_fragments() {
        let mut storage = [0u8; 4096];
        let region = Region::new(&mut storage);
        let fragmenter = Fragmenter::new(64);
        let payload = vec![0x42u8; 200];
        let fragments = fragmenter
            .fragment(&region, &payload, PitToken::from4(1), None)
            .unwrap();
        assert!(fragments.len() > 1);
        for f in &fragments {
            assert!(f.len() <= 64);
        }
    }
}
