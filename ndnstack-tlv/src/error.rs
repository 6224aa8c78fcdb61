//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

/// Errors produced while decoding TLV-encoded input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// A VAR-NUMBER (TLV-TYPE or TLV-LENGTH) could not be parsed, either
    /// because the input ran out or because it used the unsupported
    /// 9-octet form.
    InvalidVarNum,
    /// TLV-LENGTH claims more bytes than remain in the enclosing buffer.
    LengthOutOfBounds { declared: usize, remaining: usize },
    /// The outer TLV-TYPE did not match any of the types an `EvDecoder`
    /// caller declared acceptable.
    UnexpectedTopType(u32),
    /// A critical (unrecognized, non-ignorable) TLV-TYPE was encountered.
    Critical(u32),
    /// A recognized TLV-TYPE appeared out of its declared order, or a
    /// non-repeatable TLV-TYPE appeared more than once.
    OutOfOrder(u32),
    /// A NonNegativeInteger field had a length other than 1, 2, 4, or 8,
    /// or exceeded the caller-supplied maximum.
    InvalidNni,
    /// A fixed-size field (e.g. a 32-byte digest) had the wrong length.
    InvalidLength { tlv_type: u32, length: usize },
}

pub type DecodeResult<T> = Result<T, DecodeError>;

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidVarNum => write!(f, "invalid VAR-NUMBER"),
            DecodeError::LengthOutOfBounds { declared, remaining } => {
                write!(
                    f,
                    "TLV-LENGTH {declared} exceeds {remaining} remaining bytes"
                )
            }
            DecodeError::UnexpectedTopType(t) => {
                write!(f, "unexpected top-level TLV-TYPE {t}")
            }
            DecodeError::Critical(t) => {
                write!(f, "unrecognized critical TLV-TYPE {t}")
            }
            DecodeError::OutOfOrder(t) => {
                write!(f, "TLV-TYPE {t} out of order or repeated")
            }
            DecodeError::InvalidNni => write!(f, "invalid NonNegativeInteger"),
            DecodeError::InvalidLength { tlv_type, length } => {
                write!(f, "TLV-TYPE {tlv_type} has invalid length {length}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}
