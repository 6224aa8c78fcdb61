//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! Typed name component conventions: numeric components (Segment,
//! ByteOffset, Version, Timestamp, SequenceNum), the Keyword string
//! component, and the two SHA-256 digest components.

use ndnstack_region::Region;
use ndnstack_tlv::nni;

use crate::an::tt;
use crate::component::Component;

/// Length in bytes of a SHA-256 digest component's TLV-VALUE.
pub const DIGEST_LEN: usize = 32;

/// Builds a numeric name component of type `tlv_type` holding `n`,
/// encoded with the narrowest NNI width (mirroring `convention::Segment`
/// and friends).
pub fn build_number<'b>(region: &'b Region<'b>, tlv_type: u32, n: u64) -> Option<Component<'b>> {
    let mut enc = ndnstack_tlv::Encoder::new(region)?;
    nni::encode(&mut enc, n);
    let value_len = enc.size();
    enc.prepend_type_length(tlv_type, value_len);
    if !enc.is_ok() {
        enc.discard();
        return None;
    }
    let tlv = enc.trim();
    let (parsed, _) = ndnstack_tlv::Tlv::read(tlv).ok()?;
    Component::from_tlv(&parsed).ok()
}

/// Reads a numeric component of type `tlv_type`, or `None` if the
/// component has a different type or an invalid NNI encoding.
pub fn read_number(comp: &Component<'_>, tlv_type: u32) -> Option<u64> {
    if comp.tlv_type() != tlv_type {
        return None;
    }
    let tlv = ndnstack_tlv::Tlv {
        tlv_type,
        length: comp.value().len(),
        value: comp.value(),
        tlv: comp.tlv(),
    };
    nni::decode(&tlv, u64::MAX).ok()
}

pub fn build_segment<'b>(region: &'b Region<'b>, n: u64) -> Option<Component<'b>> {
    build_number(region, tt::SEGMENT_NAME_COMPONENT, n)
}

pub fn read_segment(comp: &Component<'_>) -> Option<u64> {
    read_number(comp, tt::SEGMENT_NAME_COMPONENT)
}

pub fn build_byte_offset<'b>(region: &'b Region<'b>, n: u64) -> Option<Component<'b>> {
    build_number(region, tt::BYTE_OFFSET_NAME_COMPONENT, n)
}

pub fn build_version<'b>(region: &'b Region<'b>, n: u64) -> Option<Component<'b>> {
    build_number(region, tt::VERSION_NAME_COMPONENT, n)
}

pub fn build_timestamp<'b>(region: &'b Region<'b>, n: u64) -> Option<Component<'b>> {
    build_number(region, tt::TIMESTAMP_NAME_COMPONENT, n)
}

pub fn build_sequence_num<'b>(region: &'b Region<'b>, n: u64) -> Option<Component<'b>> {
    build_number(region, tt::SEQUENCE_NUM_NAME_COMPONENT, n)
}

/// Builds a Keyword (string) name component.
pub fn build_keyword<'b>(region: &'b Region<'b>, keyword: &str) -> Option<Component<'b>> {
    Component::build(region, tt::KEYWORD_NAME_COMPONENT, keyword.as_bytes())
}

pub fn read_keyword<'a>(comp: &Component<'a>) -> Option<&'a str> {
    if comp.tlv_type() != tt::KEYWORD_NAME_COMPONENT {
        return None;
    }
    std::str::from_utf8(comp.value()).ok()
}

/// Builds an ImplicitSha256DigestComponent from a 32-byte digest.
pub fn build_implicit_digest<'b>(
    region: &'b Region<'b>,
    digest: &[u8; DIGEST_LEN],
) -> Option<Component<'b>> {
    Component::build(region, tt::IMPLICIT_SHA256_DIGEST_COMPONENT, digest)
}

/// Builds a ParametersSha256DigestComponent from a 32-byte digest.
pub fn build_params_digest<'b>(
    region: &'b Region<'b>,
    digest: &[u8; DIGEST_LEN],
) -> Option<Component<'b>> {
    Component::build(region, tt::PARAMETERS_SHA256_DIGEST_COMPONENT, digest)
}

pub fn is_implicit_digest(comp: &Component<'_>) -> bool {
    comp.tlv_type() == tt::IMPLICIT_SHA256_DIGEST_COMPONENT && comp.value().len() == DIGEST_LEN
}

pub fn is_params_digest(comp: &Component<'_>) -> bool {
    comp.tlv_type() == tt::PARAMETERS_SHA256_DIGEST_COMPONENT && comp.value().len() == DIGEST_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_segment() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let comp = build_segment(&region, 42).unwrap();
        assert_eq!(comp.tlv_type(), tt::SEGMENT_NAME_COMPONENT);
        assert_eq!(read_segment(&comp), Some(42));
    }

    #[test]
    fn round_trips_keyword() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let comp = build_keyword(&region, "metadata").unwrap();
        assert_eq!(read_keyword(&comp), Some("metadata"));
    }

    #[test]
    fn recognizes_digest_components() {
        let mut storage = [0u8; 64];
        let region = Region::new(&mut storage);
        let digest = [7u8; DIGEST_LEN];
        let comp = build_implicit_digest(&region, &digest).unwrap();
        assert!(is_implicit_digest(&comp));
        assert!(!is_params_digest(&comp));
    }
}
