//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use ndnstack_region::Region;
use ndnstack_tlv::{DecodeError, DecodeResult, Encoder, Tlv};

use crate::an::tt;

/// A single name component, borrowing its encoded TLV from a region.
///
/// Immutable once constructed; equality and ordering are the bytewise
/// comparison of the encoded TLV-TYPE/TLV-LENGTH/TLV-VALUE octets, which is
/// what NDN name component comparison is defined over.
#[derive(Clone, Copy, Debug)]
pub struct Component<'b> {
    tlv: &'b [u8],
    tlv_type: u32,
    value: &'b [u8],
}

impl<'b> Component<'b> {
    /// Wraps an already-decoded TLV as a component, rejecting TLV-TYPEs
    /// outside the 16-bit range name components are restricted to.
    pub fn from_tlv(tlv: &Tlv<'b>) -> DecodeResult<Component<'b>> {
        if tlv.tlv_type == 0 || tlv.tlv_type > 0xFFFF {
            return Err(DecodeError::InvalidLength {
                tlv_type: tlv.tlv_type,
                length: tlv.length,
            });
        }
        Ok(Component {
            tlv: tlv.tlv,
            tlv_type: tlv.tlv_type,
            value: tlv.value,
        })
    }

    /// Builds a component of `tlv_type` from a value, copying `value` into
    /// `region`.
    pub fn build(region: &'b Region<'b>, tlv_type: u32, value: &[u8]) -> Option<Component<'b>> {
        let mut enc = Encoder::new(region)?;
        enc.prepend_tlv(tlv_type, false, |e| {
            e.prepend_bytes(value);
        });
        if !enc.is_ok() {
            enc.discard();
            return None;
        }
        let tlv = enc.trim();
        let (parsed, _) = Tlv::read(tlv).ok()?;
        Component::from_tlv(&parsed).ok()
    }

    /// Builds a GenericNameComponent.
    pub fn generic(region: &'b Region<'b>, value: &[u8]) -> Option<Component<'b>> {
        Component::build(region, tt::GENERIC_NAME_COMPONENT, value)
    }

    pub fn tlv_type(&self) -> u32 {
        self.tlv_type
    }

    pub fn value(&self) -> &'b [u8] {
        self.value
    }

    /// The entire encoded TLV (type, length, and value octets).
    pub fn tlv(&self) -> &'b [u8] {
        self.tlv
    }

    pub fn is_generic(&self) -> bool {
        self.tlv_type == tt::GENERIC_NAME_COMPONENT
    }
}

impl PartialEq for Component<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.tlv == other.tlv
    }
}

impl Eq for Component<'_> {}

impl PartialOrd for Component<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Component<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.tlv.cmp(other.tlv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_generic_component() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let comp = Component::generic(&region, b"hello").unwrap();
        assert!(comp.is_generic());
        assert_eq!(comp.value(), b"hello");
        assert_eq!(comp.tlv(), &[0x08, 0x05, b'h', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn orders_bytewise() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let a = Component::generic(&region, b"a").unwrap();
        let b = Component::generic(&region, b"b").unwrap();
        assert!(a < b);
    }
}
