//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! TLV-TYPE and enumeration assigned numbers from the NDN Packet Format
//! v0.3 specification.

/// TLV-TYPE assigned numbers.
#[allow(non_upper_case_globals, missing_docs)]
pub mod tt {
    pub const LP_PACKET: u32 = 0x64;
    pub const LP_PAYLOAD: u32 = 0x50;
    pub const LP_SEQ_NUM: u32 = 0x51;
    pub const FRAG_INDEX: u32 = 0x52;
    pub const FRAG_COUNT: u32 = 0x53;
    pub const PIT_TOKEN: u32 = 0x62;
    pub const NACK: u32 = 0x0320;
    pub const NACK_REASON: u32 = 0x0321;
    pub const CONGESTION_MARK: u32 = 0x0340;

    pub const NAME: u32 = 0x07;
    pub const GENERIC_NAME_COMPONENT: u32 = 0x08;
    pub const IMPLICIT_SHA256_DIGEST_COMPONENT: u32 = 0x01;
    pub const PARAMETERS_SHA256_DIGEST_COMPONENT: u32 = 0x02;
    pub const KEYWORD_NAME_COMPONENT: u32 = 0x20;
    pub const SEGMENT_NAME_COMPONENT: u32 = 0x32;
    pub const BYTE_OFFSET_NAME_COMPONENT: u32 = 0x34;
    pub const VERSION_NAME_COMPONENT: u32 = 0x36;
    pub const TIMESTAMP_NAME_COMPONENT: u32 = 0x38;
    pub const SEQUENCE_NUM_NAME_COMPONENT: u32 = 0x3A;

    pub const INTEREST: u32 = 0x05;
    pub const CAN_BE_PREFIX: u32 = 0x21;
    pub const MUST_BE_FRESH: u32 = 0x12;
    pub const FORWARDING_HINT: u32 = 0x1E;
    pub const NONCE: u32 = 0x0A;
    pub const INTEREST_LIFETIME: u32 = 0x0C;
    pub const HOP_LIMIT: u32 = 0x22;
    pub const APP_PARAMETERS: u32 = 0x24;
    pub const I_SIG_INFO: u32 = 0x2C;
    pub const I_SIG_VALUE: u32 = 0x2E;

    pub const DATA: u32 = 0x06;
    pub const META_INFO: u32 = 0x14;
    pub const CONTENT_TYPE: u32 = 0x18;
    pub const FRESHNESS_PERIOD: u32 = 0x19;
    pub const FINAL_BLOCK: u32 = 0x1A;
    pub const CONTENT: u32 = 0x15;
    pub const D_SIG_INFO: u32 = 0x16;
    pub const D_SIG_VALUE: u32 = 0x17;

    pub const SIG_TYPE: u32 = 0x1B;
    pub const KEY_LOCATOR: u32 = 0x1C;
    pub const KEY_DIGEST: u32 = 0x1D;
    pub const SIG_NONCE: u32 = 0x26;
    pub const SIG_TIME: u32 = 0x28;
    pub const SIG_SEQ_NUM: u32 = 0x2A;

    pub const VALIDITY_PERIOD: u32 = 0x00FD;
    pub const NOT_BEFORE: u32 = 0x00FE;
    pub const NOT_AFTER: u32 = 0x00FF;
}

/// ContentType assigned numbers.
#[allow(missing_docs)]
pub mod content_type {
    pub const BLOB: u8 = 0x00;
    pub const LINK: u8 = 0x01;
    pub const KEY: u8 = 0x02;
    pub const NACK: u8 = 0x03;
    pub const PREFIX_ANN: u8 = 0x05;
}

/// SignatureType assigned numbers.
#[allow(missing_docs)]
pub mod sig_type {
    pub const SHA256: u8 = 0x00;
    pub const SHA256_WITH_RSA: u8 = 0x01;
    pub const SHA256_WITH_ECDSA: u8 = 0x03;
    pub const HMAC_WITH_SHA256: u8 = 0x04;
    pub const NULL: u8 = 0xC8;
}

/// Nack reason internal 3-bit representation (not an assigned number).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum NackReason {
    #[default]
    None = 0,
    Congestion = 1,
    Duplicate = 2,
    NoRoute = 3,
    Unspecified = 7,
}

impl NackReason {
    pub(crate) fn to_wire(self) -> u64 {
        self as u64 * 50
    }

    pub(crate) fn from_wire(v: u64) -> NackReason {
        match v {
            50 => NackReason::Congestion,
            100 => NackReason::Duplicate,
            150 => NackReason::NoRoute,
            _ => NackReason::Unspecified,
        }
    }
}
