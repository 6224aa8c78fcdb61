//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use ndnstack_region::Region;

use crate::varnum::{size_of_var_num, write_var_num};

/// Back-to-front TLV encoder writing into the tail of a [`Region`].
///
/// Fields are prepended in reverse order (innermost first), mirroring how
/// TLV-LENGTH can only be computed once TLV-VALUE is known. Once an
/// operation fails (usually because the region ran out of space), the
/// encoder is "poisoned": every subsequent prepend is a silent no-op and
/// [`Encoder::is_ok`] returns `false`.
pub struct Encoder<'b> {
    region: &'b Region<'b>,
    // The whole reserved buffer, fixed at construction time.
    buf: &'b mut [u8],
    // Current front of the written-so-far output, i.e. `buf[pos..]` is
    // valid output; `buf[..pos]` is still unused. `pos == buf.len()`
    // means nothing has been written yet.
    pos: usize,
    ok: bool,
}

impl<'b> Encoder<'b> {
    /// Creates an encoder over all remaining space in `region`.
    pub fn new(region: &'b Region<'b>) -> Option<Encoder<'b>> {
        let capacity = region.available();
        let buf = region.alloc(capacity)?;
        let pos = buf.len();
        Some(Encoder {
            region,
            buf,
            pos,
            ok: true,
        })
    }

    /// Whether no error (e.g. out-of-space) has occurred yet.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// The encoded bytes written so far, in wire order.
    pub fn output(&self) -> &[u8] {
        if self.ok {
            &self.buf[self.pos..]
        } else {
            &[]
        }
    }

    /// Number of bytes written so far.
    pub fn size(&self) -> usize {
        self.output().len()
    }

    /// Reserves `size` bytes immediately before the current output and
    /// returns them for the caller to fill in, or `None` (poisoning the
    /// encoder) if there isn't enough room left.
    pub fn prepend_room(&mut self, size: usize) -> Option<&mut [u8]> {
        if !self.ok || self.pos < size {
            self.ok = false;
            return None;
        }
        self.pos -= size;
        Some(&mut self.buf[self.pos..self.pos + size])
    }

    /// Prepends a raw byte string verbatim (no TLV framing).
    pub fn prepend_bytes(&mut self, bytes: &[u8]) -> bool {
        match self.prepend_room(bytes.len()) {
            Some(room) => {
                room.copy_from_slice(bytes);
                true
            }
            None => false,
        }
    }

    /// Prepends TLV-TYPE and TLV-LENGTH octets for a value of the given
    /// length; the value itself must already have been prepended.
    pub fn prepend_type_length(&mut self, tlv_type: u32, length: usize) -> bool {
        let size_t = size_of_var_num(tlv_type);
        let size_l = size_of_var_num(length as u32);
        let Some(room) = self.prepend_room(size_t + size_l) else {
            return false;
        };
        let (type_room, length_room) = room.split_at_mut(size_t);
        write_var_num(type_room, tlv_type);
        write_var_num(length_room, length as u32);
        true
    }

    /// Prepends a complete TLV element: runs `write_value` to emit
    /// TLV-VALUE (via further prepends), then measures what it wrote and
    /// prepends TLV-TYPE and TLV-LENGTH. If `write_value` emits nothing
    /// and `omit_empty` is set, the TLV is skipped entirely (but the call
    /// is still reported successful).
    pub fn prepend_tlv(
        &mut self,
        tlv_type: u32,
        omit_empty: bool,
        write_value: impl FnOnce(&mut Self),
    ) -> bool {
        let before = self.pos;
        write_value(self);
        let length = before - self.pos;
        if length == 0 && omit_empty {
            return self.ok;
        }
        self.ok && self.prepend_type_length(tlv_type, length)
    }

    /// Marks the encoder as failed; subsequent prepends are no-ops.
    pub fn set_error(&mut self) {
        self.ok = false;
    }

    /// Returns the unused head of the reserved buffer to the region.
    ///
    /// After calling this, only the returned slice remains meaningful;
    /// the encoder is consumed.
    pub fn trim(self) -> &'b [u8] {
        let Encoder { region, buf, pos, ok } = self;
        let used_from = if ok { pos } else { buf.len() };
        region.free(&buf[..used_from]);
        // `buf` is owned outright (not re-borrowed from `self`, which was
        // just consumed), so downgrading `&'b mut [u8]` to `&'b [u8]`
        // keeps the full `'b` lifetime.
        let buf: &'b [u8] = buf;
        &buf[used_from..]
    }

    /// Releases the entire reserved buffer back to the region, discarding
    /// any output.
    pub fn discard(self) {
        self.region.free(self.buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_build_wire_order() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let mut enc = Encoder::new(&region).unwrap();
        enc.prepend_bytes(&[0x41]);
        enc.prepend_type_length(0x08, 1);
        assert_eq!(enc.output(), &[0x08, 0x01, 0x41]);
    }

    #[test]
    fn prepend_tlv_measures_length() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let mut enc = Encoder::new(&region).unwrap();
        enc.prepend_tlv(0x08, false, |e| {
            e.prepend_bytes(&[0x41]);
        });
        assert_eq!(enc.output(), &[0x08, 0x01, 0x41]);
    }

    #[test]
    fn omit_empty_skips_tlv() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let mut enc = Encoder::new(&region).unwrap();
        enc.prepend_tlv(0x08, true, |_e| {});
        assert_eq!(enc.output(), &[] as &[u8]);
    }

    #[test]
    fn out_of_space_poisons_encoder() {
        let mut storage = [0u8; 2];
        let region = Region::new(&mut storage);
        let mut enc = Encoder::new(&region).unwrap();
        assert!(!enc.prepend_bytes(&[0u8; 3]));
        assert!(!enc.is_ok());
        assert!(!enc.prepend_bytes(&[0u8]));
        assert_eq!(enc.output(), &[] as &[u8]);
    }
}
