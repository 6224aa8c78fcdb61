//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! NonNegativeInteger (NNI) encoding: big-endian integers stored in a
//! TLV-VALUE of length 1, 2, 4, or 8.

use crate::decoder::Tlv;
use crate::encoder::Encoder;
use crate::error::DecodeError;

/// Encodes `n` using the narrowest of the four NNI widths that can hold
/// it.
pub fn encode(encoder: &mut Encoder<'_>, n: u64) {
    if n <= u8::MAX as u64 {
        encoder.prepend_bytes(&(n as u8).to_be_bytes());
    } else if n <= u16::MAX as u64 {
        encoder.prepend_bytes(&(n as u16).to_be_bytes());
    } else if n <= u32::MAX as u64 {
        encoder.prepend_bytes(&(n as u32).to_be_bytes());
    } else {
        encoder.prepend_bytes(&n.to_be_bytes());
    }
}

/// Encodes `n` using a fixed width, regardless of its value.
pub fn encode_fixed(encoder: &mut Encoder<'_>, n: u64, width: usize) {
    match width {
        1 => encoder.prepend_bytes(&(n as u8).to_be_bytes()),
        2 => encoder.prepend_bytes(&(n as u16).to_be_bytes()),
        4 => encoder.prepend_bytes(&(n as u32).to_be_bytes()),
        8 => encoder.prepend_bytes(&n.to_be_bytes()),
        _ => panic!("unsupported NNI width {width}"),
    };
}

/// Decodes a NonNegativeInteger from a TLV-VALUE, rejecting lengths other
/// than {1, 2, 4, 8} and values exceeding `max`.
pub fn decode(tlv: &Tlv<'_>, max: u64) -> DecodeResultU64 {
    let n = match tlv.value.len() {
        1 => tlv.value[0] as u64,
        2 => u16::from_be_bytes([tlv.value[0], tlv.value[1]]) as u64,
        4 => u32::from_be_bytes(tlv.value.try_into().unwrap()) as u64,
        8 => u64::from_be_bytes(tlv.value.try_into().unwrap()),
        _ => return Err(DecodeError::InvalidNni),
    };
    if n > max {
        return Err(DecodeError::InvalidNni);
    }
    Ok(n)
}

type DecodeResultU64 = Result<u64, DecodeError>;

#[cfg(test)]
mod tests {
    use ndnstack_region::Region;

    use super::*;

    #[test]
    fn round_trips_every_width() {
        for n in [0u64, 0xFF, 0x100, 0xFFFF, 0x1_0000, u32::MAX as u64, u64::MAX] {
            let mut storage = [0u8; 32];
            let region = Region::new(&mut storage);
            let mut enc = Encoder::new(&region).unwrap();
            encode(&mut enc, n);
            let bytes = enc.output().to_vec();
            let (tlv, _) =
                crate::decoder::Tlv::read(&[&[0x00, bytes.len() as u8][..], &bytes[..]].concat())
                    .unwrap();
            assert_eq!(decode(&tlv, u64::MAX).unwrap(), n);
        }
    }

    #[test]
    fn rejects_bad_length() {
        let tlv = Tlv {
            tlv_type: 0,
            length: 3,
            value: &[1, 2, 3],
            tlv: &[],
        };
        assert_eq!(decode(&tlv, u64::MAX), Err(DecodeError::InvalidNni));
    }

    #[test]
    fn rejects_value_above_max() {
        let tlv = Tlv {
            tlv_type: 0,
            length: 1,
            value: &[255],
            tlv: &[],
        };
        assert_eq!(decode(&tlv, 10), Err(DecodeError::InvalidNni));
    }
}
