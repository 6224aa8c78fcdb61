//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use std::cmp::Ordering;
use std::fmt;

use ndnstack_region::Region;
use ndnstack_tlv::{DecodeError, DecodeResult, Decoder, Encoder, Tlv};

use crate::component::Component;

/// Result of comparing two names, per NDN's canonical name ordering.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameCompare {
    /// `lhs` is less than, but not a prefix of, `rhs`.
    Lt,
    /// `lhs` is a prefix of `rhs`.
    LPrefix,
    /// `lhs` and `rhs` are equal.
    Equal,
    /// `rhs` is a prefix of `lhs`.
    RPrefix,
    /// `rhs` is less than, but not a prefix of, `lhs`.
    Gt,
}

/// An NDN name: a sequence of TLV-encoded components, borrowed from a
/// region.
///
/// Immutable once constructed. Comparison is the bytewise, prefix-aware
/// ordering over the encoded TLV-VALUE defined by the NDN name component
/// spec, not a per-component comparison.
#[derive(Clone, Copy, Debug)]
pub struct Name<'b> {
    value: &'b [u8],
    n_comps: usize,
}

impl<'b> Name<'b> {
    /// The empty name.
    pub fn empty() -> Name<'static> {
        Name {
            value: &[],
            n_comps: 0,
        }
    }

    /// Decodes a Name's TLV-VALUE (the bytes between a `Name` TLV's
    /// length and its end), validating every component without copying.
    pub fn from_value(value: &'b [u8]) -> DecodeResult<Name<'b>> {
        let mut n_comps = 0;
        let mut decoder = Decoder::new(value);
        for tlv in decoder.by_ref() {
            Component::from_tlv(&tlv)?;
            n_comps += 1;
        }
        if let Some(err) = decoder.error() {
            return Err(err.clone());
        }
        Ok(Name { value, n_comps })
    }

    /// Decodes a `Name` TLV element.
    pub fn from_tlv(tlv: &Tlv<'b>) -> DecodeResult<Name<'b>> {
        if tlv.tlv_type != crate::an::tt::NAME {
            return Err(DecodeError::UnexpectedTopType(tlv.tlv_type));
        }
        Name::from_value(tlv.value)
    }

    fn from_raw(value: &'b [u8], n_comps: usize) -> Name<'b> {
        Name { value, n_comps }
    }

    pub fn value(&self) -> &'b [u8] {
        self.value
    }

    pub fn len(&self) -> usize {
        self.n_comps
    }

    pub fn is_empty(&self) -> bool {
        self.n_comps == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Component<'b>> {
        Decoder::new(self.value).map(|tlv| Component::from_tlv(&tlv).expect("already validated"))
    }

    fn resolve_index(&self, i: i64) -> Option<usize> {
        let i = if i < 0 { i + self.n_comps as i64 } else { i };
        if i < 0 || i as usize >= self.n_comps {
            None
        } else {
            Some(i as usize)
        }
    }

    /// Returns the i-th component; negative indices count from the end.
    pub fn get(&self, i: i64) -> Option<Component<'b>> {
        let idx = self.resolve_index(i)?;
        self.iter().nth(idx)
    }

    /// Returns the sub name `[first, last)`. Negative indices count from
    /// the end; `last <= 0` also counts from the end.
    pub fn slice(&self, first: i64, last: i64) -> Option<Name<'b>> {
        let first = if first < 0 { first + self.n_comps as i64 } else { first };
        let last = if last <= 0 { last + self.n_comps as i64 } else { last };
        if first < 0 || last < 0 || first as usize > self.n_comps || last as usize > self.n_comps
        {
            return None;
        }
        let (first, last) = (first as usize, last as usize);
        if first >= last {
            return Some(Name::from_raw(&self.value[0..0], 0));
        }

        let mut decoder = Decoder::new(self.value);
        let mut start = 0usize;
        let mut end = 0usize;
        let mut pos = 0usize;
        let mut consumed = 0usize;
        for tlv in decoder.by_ref() {
            let tlv_len = tlv.tlv.len();
            if pos == first {
                start = consumed;
            }
            consumed += tlv_len;
            if pos + 1 == last {
                end = consumed;
            }
            pos += 1;
        }
        Some(Name::from_raw(&self.value[start..end], last - first))
    }

    /// Returns the prefix of `n` components; `n <= 0` counts from the end.
    pub fn prefix(&self, n: i64) -> Option<Name<'b>> {
        self.slice(0, n)
    }

    /// Appends a sequence of components, copying into `region`.
    pub fn append(&self, region: &'b Region<'b>, comps: &[Component<'b>]) -> Option<Name<'b>> {
        let mut total = self.value.len();
        for c in comps {
            total += c.tlv().len();
        }
        let buf = region.alloc(total)?;
        let (head, mut rest) = buf.split_at_mut(self.value.len());
        head.copy_from_slice(self.value);
        for c in comps {
            let (this, next) = rest.split_at_mut(c.tlv().len());
            this.copy_from_slice(c.tlv());
            rest = next;
        }
        Some(Name::from_raw(buf, self.n_comps + comps.len()))
    }

    /// Compares this name against `other` per NDN's canonical ordering.
    pub fn compare(&self, other: &Name<'_>) -> NameCompare {
        let common = self.value.len().min(other.value.len());
        match self.value[..common].cmp(&other.value[..common]) {
            Ordering::Less => NameCompare::Lt,
            Ordering::Greater => NameCompare::Gt,
            Ordering::Equal => {
                if self.value.len() > common {
                    NameCompare::RPrefix
                } else if other.value.len() > common {
                    NameCompare::LPrefix
                } else {
                    NameCompare::Equal
                }
            }
        }
    }

    pub fn is_prefix_of(&self, other: &Name<'_>) -> bool {
        matches!(
            self.compare(other),
            NameCompare::LPrefix | NameCompare::Equal
        )
    }

    /// Encodes this name as a `Name` TLV.
    pub fn encode_to(&self, encoder: &mut Encoder<'_>) {
        encoder.prepend_tlv(crate::an::tt::NAME, false, |e| {
            e.prepend_bytes(self.value);
        });
    }
}

impl PartialEq for Name<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == NameCompare::Equal
    }
}

impl Eq for Name<'_> {}

impl PartialOrd for Name<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(match self.compare(other) {
            NameCompare::Lt | NameCompare::LPrefix => Ordering::Less,
            NameCompare::Equal => Ordering::Equal,
            NameCompare::RPrefix | NameCompare::Gt => Ordering::Greater,
        })
    }
}

impl Ord for Name<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "/");
        }
        for comp in self.iter() {
            write!(f, "/")?;
            if comp.is_generic() {
                for &b in comp.value() {
                    if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                        write!(f, "{}", b as char)?;
                    } else {
                        write!(f, "%{b:02X}")?;
                    }
                }
            } else {
                write!(f, "{}=", comp.tlv_type())?;
                for &b in comp.value() {
                    write!(f, "{b:02x}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    #[test]
    fn decodes_and_counts_components() {
        let wire = [0x08, 0x01, b'a', 0x08, 0x01, b'b'];
        let name = Name::from_value(&wire).unwrap();
        assert_eq!(name.len(), 2);
        assert_eq!(name.get(0).unwrap().value(), b"a");
        assert_eq!(name.get(-1).unwrap().value(), b"b");
    }

    #[test]
    fn compares_by_prefix() {
        let a = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let ab = Name::from_value(&[0x08, 0x01, b'a', 0x08, 0x01, b'b']).unwrap();
        assert_eq!(a.compare(&ab), NameCompare::LPrefix);
        assert!(a.is_prefix_of(&ab));
        assert!(!ab.is_prefix_of(&a));
    }

    #[test]
    fn slices_a_range() {
        let wire = [0x08, 0x01, b'a', 0x08, 0x01, b'b', 0x08, 0x01, b'c'];
        let name = Name::from_value(&wire).unwrap();
        let mid = name.slice(1, 2).unwrap();
        assert_eq!(mid.len(), 1);
        assert_eq!(mid.get(0).unwrap().value(), b"b");
    }

    #[test]
    fn appends_components() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let base = Name::from_value(&[0x08, 0x01, b'a']).unwrap();
        let extra = Component::generic(&region, b"b").unwrap();
        let appended = base.append(&region, &[extra]).unwrap();
        assert_eq!(appended.len(), 2);
        assert_eq!(appended.get(1).unwrap().value(), b"b");
    }

    #[test]
    fn displays_generic_and_typed_components() {
        let name = Name::from_value(&[0x08, 0x01, b'a', 0x32, 0x01, 0x07]).unwrap();
        assert_eq!(name.to_string(), "/a/50=07");
    }
}
