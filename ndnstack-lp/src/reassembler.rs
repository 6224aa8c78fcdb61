//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use ndnstack_region::Region;

use crate::classify::L3Header;
use crate::fragment::FragmentHeader;

struct Pending<'b> {
    seq_num_base: u64,
    frag_count: u8,
    received: Vec<Option<&'b [u8]>>,
    received_count: u8,
    l3: L3Header<'b>,
}

/// Buffers LP fragments by their shared sequence-number base and hands
/// back the reassembled payload once every fragment of a run has
/// arrived.
///
/// Unlike the fixed-capacity ring the embedded reference implementation
/// uses, this buffers an unbounded number of in-progress runs up to
/// `max_pending`, evicting the oldest incomplete run (by insertion order)
/// once that bound is reached.
pub struct Reassembler<'b> {
    pending: Vec<Pending<'b>>,
    max_pending: usize,
}

impl<'b> Reassembler<'b> {
    pub fn new(max_pending: usize) -> Reassembler<'b> {
        Reassembler {
            pending: Vec::new(),
            max_pending,
        }
    }

    /// Adds one received fragment. Returns the fragments of a complete
    /// run, in order, once `header` completes it.
    pub fn add(
        &mut self,
        header: FragmentHeader,
        l3: L3Header<'b>,
        payload: &'b [u8],
    ) -> Option<(L3Header<'b>, Vec<&'b [u8]>)> {
        let seq_num_base = header.seq_num_base();
        let idx = match self
            .pending
            .iter()
            .position(|p| p.seq_num_base == seq_num_base)
        {
            Some(idx) => idx,
            None => {
                if self.pending.len() >= self.max_pending {
                    self.pending.remove(0);
                }
                self.pending.push(Pending {
                    seq_num_base,
                    frag_count: header.frag_count,
                    received: vec![None; header.frag_count as usize],
                    received_count: 0,
                    l3,
                });
                self.pending.len() - 1
            }
        };

        let entry = &mut self.pending[idx];
        if entry.frag_count != header.frag_count {
            // Inconsistent fragment count for this run: drop it.
            self.pending.remove(idx);
            return None;
        }
        let slot = entry.received.get_mut(header.frag_index as usize)?;
        if slot.is_none() {
            *slot = Some(payload);
            entry.received_count += 1;
        }
        if header.frag_index == 0 {
            entry.l3 = l3;
        }

        if entry.received_count != entry.frag_count {
            return None;
        }

        let entry = self.pending.remove(idx);
        let parts = entry.received.into_iter().collect::<Option<Vec<_>>>()?;
        Some((entry.l3, parts))
    }

    /// Number of runs currently buffered, partially reassembled.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Concatenates reassembled fragment payloads into one contiguous
/// buffer, ready to be parsed as a single L3 TLV.
pub fn concat_parts<'b>(region: &'b Region<'b>, parts: &[&[u8]]) -> Option<&'b [u8]> {
    let total: usize = parts.iter().map(|p| p.len()).sum();
    let buf = region.alloc(total)?;
    let mut offset = 0;
    for part in parts {
        buf[offset..offset + part.len()].copy_from_slice(part);
        offset += part.len();
    }
    Some(buf)
}

#[cfg(test)]
mod tests {
    use ndnstack_packet::Name;

    use super::*;
    use crate::classify::{classify, Classified};
    use crate::fragment::Fragmenter;
    use crate::pit_token::PitToken;
    use ndnstack_packet::Interest;
    use ndnstack_tlv::Tlv;

    #[test]
    fn reassembles_fragmented_interest() {
        let mut storage = [0u8; 8192];
        let region = Region::new(&mut storage);
        let name = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let interest = Interest::new(name);
        let wire = interest.encode(&region).unwrap();

        let fragmenter = Fragmenter::new(32);
        let fragments = fragmenter
            .fragment(&region, wire, PitToken::from4(42), None)
            .unwrap();
        assert!(fragments.len() > 1);

        let mut reassembler = Reassembler::new(4);
        let mut result = None;
        for frag_wire in &fragments {
            let (tlv, _) = Tlv::read(frag_wire).unwrap();
            let Classified::Fragment { header, l3, payload } = classify(&tlv).unwrap() else {
                panic!("expected a fragment");
            };
            result = reassembler.add(header, l3, payload);
        }

        let (l3, parts) = result.expect("run should be complete after the last fragment");
        assert_eq!(l3.pit_token.to4(), Some(42));
        let whole = concat_parts(&region, &parts).unwrap();
        assert_eq!(whole, wire);
    }

    #[test]
    fn evicts_oldest_run_once_full() {
        let mut reassembler: Reassembler<'static> = Reassembler::new(1);
        let l3 = L3Header::default();
        let header_a = FragmentHeader {
            seq_num: 0,
            frag_index: 0,
            frag_count: 2,
        };
        let header_b = FragmentHeader {
            seq_num: 100,
            frag_index: 0,
            frag_count: 2,
        };
        assert!(reassembler.add(header_a, l3, b"a0").is_none());
        assert_eq!(reassembler.pending_count(), 1);
        assert!(reassembler.add(header_b, l3, b"b0").is_none());
        // `header_a`'s run was evicted to make room; finishing it now
        // starts a fresh (incomplete) run instead of completing the old one.
        assert_eq!(reassembler.pending_count(), 1);
    }
}
