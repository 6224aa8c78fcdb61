//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

/// Maximum length of a PIT token, in octets.
pub const MAX_PIT_TOKEN_LEN: usize = 32;

/// An opaque PIT token carried in the LP header, used by a forwarder to
/// correlate a Data or Nack back to the Interest it answers without
/// consulting the PIT.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub struct PitToken {
    bytes: [u8; MAX_PIT_TOKEN_LEN],
    len: u8,
}

impl PitToken {
    /// The empty token, used when a transport does not need correlation.
    pub fn empty() -> PitToken {
        PitToken::default()
    }

    /// Builds a token from up to [`MAX_PIT_TOKEN_LEN`] bytes.
    pub fn from_bytes(value: &[u8]) -> Option<PitToken> {
        if value.len() > MAX_PIT_TOKEN_LEN {
            return None;
        }
        let mut bytes = [0u8; MAX_PIT_TOKEN_LEN];
        bytes[..value.len()].copy_from_slice(value);
        Some(PitToken {
            bytes,
            len: value.len() as u8,
        })
    }

    /// Builds a 4-octet token carrying `v` in big-endian order, the common
    /// case of a PIT slot index packed straight into the token.
    pub fn from4(v: u32) -> PitToken {
        PitToken::from_bytes(&v.to_be_bytes()).unwrap()
    }

    /// Reads this token back as a big-endian `u32`, if it is exactly 4
    /// octets long.
    pub fn to4(&self) -> Option<u32> {
        if self.len != 4 {
            return None;
        }
        Some(u32::from_be_bytes(self.bytes[..4].try_into().unwrap()))
    }

    /// Builds an 8-octet token carrying `v` in big-endian order, the form
    /// used when a PIT token is passed around as a plain `u64`.
    pub fn from8(v: u64) -> PitToken {
        PitToken::from_bytes(&v.to_be_bytes()).unwrap()
    }

    /// Reads this token back as a big-endian `u64`; tokens shorter than 8
    /// octets are zero-extended, matching `from8`'s inverse for the
    /// common case of a token that started life as a `u64`.
    pub fn to8(&self) -> u64 {
        let mut bytes = [0u8; 8];
        let len = self.len as usize;
        bytes[8 - len..].copy_from_slice(&self.bytes[..len]);
        u64::from_be_bytes(bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_4_octet_token() {
        let token = PitToken::from4(0xDEAD_BEEF);
        assert_eq!(token.to4(), Some(0xDEAD_BEEF));
        assert_eq!(token.as_bytes().len(), 4);
    }

    #[test]
    fn rejects_oversized_token() {
        let buf = [0u8; MAX_PIT_TOKEN_LEN + 1];
        assert!(PitToken::from_bytes(&buf).is_none());
    }

    #[test]
    fn round_trips_8_octet_token() {
        let token = PitToken::from8(0x0102_0304_0506_0708);
        assert_eq!(token.to8(), 0x0102_0304_0506_0708);
        assert_eq!(token.to4(), None);
    }

    #[test]
    fn empty_token_has_no_bytes() {
        assert!(PitToken::empty().is_empty());
        assert_eq!(PitToken::empty().to4(), None);
    }
}
