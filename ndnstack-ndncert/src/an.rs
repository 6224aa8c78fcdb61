//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! TLV-TYPE and status/error assigned numbers for NDNCERT v0.3.

/// TLV-TYPE assigned numbers.
#[allow(non_upper_case_globals, missing_docs)]
pub mod tt {
    pub const CA_PREFIX: u32 = 0x81;
    pub const CA_INFO: u32 = 0x83;
    pub const PARAMETER_KEY: u32 = 0x85;
    pub const PARAMETER_VALUE: u32 = 0x87;
    pub const CA_CERTIFICATE: u32 = 0x89;
    pub const MAX_VALIDITY_PERIOD: u32 = 0x8B;
    pub const PROBE_RESPONSE: u32 = 0x8D;
    pub const MAX_SUFFIX_LENGTH: u32 = 0x8F;
    pub const ECDH_PUB: u32 = 0x91;
    pub const CERT_REQUEST: u32 = 0x93;
    pub const SALT: u32 = 0x95;
    pub const REQUEST_ID: u32 = 0x97;
    pub const CHALLENGE: u32 = 0x99;
    pub const STATUS: u32 = 0x9B;
    pub const INITIALIZATION_VECTOR: u32 = 0x9D;
    pub const ENCRYPTED_PAYLOAD: u32 = 0x9F;
    pub const SELECTED_CHALLENGE: u32 = 0xA1;
    pub const CHALLENGE_STATUS: u32 = 0xA3;
    pub const REMAINING_TRIES: u32 = 0xA5;
    pub const REMAINING_TIME: u32 = 0xA7;
    pub const ISSUED_CERT_NAME: u32 = 0xA9;
    pub const ERROR_CODE: u32 = 0xAB;
    pub const ERROR_INFO: u32 = 0xAD;
    pub const AUTHENTICATION_TAG: u32 = 0xAF;
    pub const CERT_TO_REVOKE: u32 = 0xB1;
    pub const PROBE_REDIRECT: u32 = 0xB3;
}

/// Session status code, carried in the CHALLENGE response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    BeforeChallenge = 0,
    Challenge = 1,
    Pending = 2,
    Success = 3,
    Failure = 4,
}

impl Status {
    pub fn from_wire(v: u64) -> Status {
        match v {
            0 => Status::BeforeChallenge,
            1 => Status::Challenge,
            2 => Status::Pending,
            3 => Status::Success,
            _ => Status::Failure,
        }
    }

    pub fn to_wire(self) -> u64 {
        self as u64
    }
}

/// Error codes returned in a server-issued ErrorCode Data packet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    BadInterestFormat = 1,
    BadParameterFormat = 2,
    BadSignature = 3,
    InvalidParameters = 4,
    NameNotAllowed = 5,
    BadValidityPeriod = 6,
    OutOfTries = 7,
    OutOfTime = 8,
    NoAvailableName = 9,
}

impl ErrorCode {
    pub fn to_wire(self) -> u64 {
        self as u64
    }
}

/// "CA" name component, as a TLV-VALUE.
pub const CA_COMPONENT: &[u8] = b"CA";
/// "INFO" name component.
pub const INFO_COMPONENT: &[u8] = b"INFO";
/// "PROBE" name component.
pub const PROBE_COMPONENT: &[u8] = b"PROBE";
/// "NEW" name component.
pub const NEW_COMPONENT: &[u8] = b"NEW";
/// "CHALLENGE" name component.
pub const CHALLENGE_COMPONENT: &[u8] = b"CHALLENGE";
/// "KEY" name component, used in certificate names.
pub const KEY_COMPONENT: &[u8] = b"KEY";

/// Well-known challenge identifiers and parameter keys.
pub mod challenge_consts {
    pub const NOP: &str = "nop";
    pub const POSSESSION: &str = "possession";
    pub const ISSUED_CERT: &str = "issued-cert";
    pub const NONCE: &str = "nonce";
    pub const PROOF: &str = "proof";
}
