//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use crate::error::DecodeError;
use crate::varnum::read_var_num;

/// A single decoded TLV element, borrowing from the input buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tlv<'b> {
    pub tlv_type: u32,
    pub length: usize,
    /// TLV-VALUE.
    pub value: &'b [u8],
    /// The entire TLV (type, length, and value octets).
    pub tlv: &'b [u8],
}

impl<'b> Tlv<'b> {
    /// Parses one TLV element from the front of `input`.
    ///
    /// On success returns the decoded element together with the number of
    /// bytes it consumed.
    pub fn read(input: &'b [u8]) -> Result<(Tlv<'b>, usize), DecodeError> {
        let (tlv_type, size_t) = read_var_num(input).ok_or(DecodeError::InvalidVarNum)?;
        let (length, size_l) =
            read_var_num(&input[size_t..]).ok_or(DecodeError::InvalidVarNum)?;
        let length = length as usize;
        let value_start = size_t + size_l;
        let remaining = input.len() - value_start;
        if length > remaining {
            return Err(DecodeError::LengthOutOfBounds {
                declared: length,
                remaining,
            });
        }
        let total = value_start + length;
        Ok((
            Tlv {
                tlv_type,
                length,
                value: &input[value_start..total],
                tlv: &input[..total],
            },
            total,
        ))
    }

    /// Decodes `value` as a nested sequence of TLV elements.
    pub fn decoder(&self) -> Decoder<'b> {
        Decoder::new(self.value)
    }
}

/// Forward iterator over the TLV elements in a byte slice.
///
/// Iteration stops at the end of input, or enters a sticky error state on
/// malformed input; [`Decoder::is_ok`] distinguishes the two after
/// iteration completes.
#[derive(Clone, Debug)]
pub struct Decoder<'b> {
    rest: &'b [u8],
    error: Option<DecodeError>,
}

impl<'b> Decoder<'b> {
    pub fn new(input: &'b [u8]) -> Self {
        Decoder {
            rest: input,
            error: None,
        }
    }

    /// True if iteration reached the end of input without error.
    ///
    /// Meaningless (always true) until the iterator has been fully
    /// consumed.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The error that stopped iteration, if any.
    pub fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }

    /// Bytes not yet consumed by the iterator.
    pub fn remaining(&self) -> &'b [u8] {
        self.rest
    }
}

impl<'b> Iterator for Decoder<'b> {
    type Item = Tlv<'b>;

    fn next(&mut self) -> Option<Tlv<'b>> {
        if self.error.is_some() || self.rest.is_empty() {
            return None;
        }
        match Tlv::read(self.rest) {
            Ok((tlv, consumed)) => {
                self.rest = &self.rest[consumed..];
                Some(tlv)
            }
            Err(e) => {
                self.error = Some(e);
                self.rest = &[];
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sequential_elements() {
        // 08 01 41 08 01 42 -- two GenericNameComponent TLVs.
        let input = [0x08, 0x01, 0x41, 0x08, 0x01, 0x42];
        let elems: Vec<_> = Decoder::new(&input).collect();
        assert_eq!(elems.len(), 2);
        assert_eq!(elems[0].tlv_type, 0x08);
        assert_eq!(elems[0].value, &[0x41]);
        assert_eq!(elems[1].value, &[0x42]);
    }

    #[test]
    fn stops_with_error_on_truncated_length() {
        let input = [0x08, 0x05, 0x41];
        let mut decoder = Decoder::new(&input);
        assert!(decoder.next().is_none());
        assert!(!decoder.is_ok());
        assert!(matches!(
            decoder.error(),
            Some(DecodeError::LengthOutOfBounds { .. })
        ));
    }

    #[test]
    fn empty_input_is_ok() {
        let decoder = Decoder::new(&[]);
        assert!(decoder.is_ok());
    }
}
