//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! Session key derivation and the encrypted-frame codec shared by the
//! client and server halves of the NDNCERT CHALLENGE exchange.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Nonce};
use hkdf::Hkdf;
use p256::ecdh::{EphemeralSecret, SharedSecret};
use p256::PublicKey;
use rand::RngCore;
use sha2::Sha256;

use ndnstack_region::Region;
use ndnstack_tlv::{Decoder, DecodeError, DecodeResult, ElementDef, Encoder};

use crate::an::tt;

/// Copies `bytes` into `region`, for rebuilding a [`ndnstack_packet::Name`]
/// from owned session state (e.g. a stored CA prefix) so it shares the
/// region's lifetime with the rest of a freshly built packet.
pub fn copy_into<'b>(region: &'b Region<'b>, bytes: &[u8]) -> Option<&'b [u8]> {
    let buf = region.alloc(bytes.len())?;
    buf.copy_from_slice(bytes);
    Some(buf)
}

/// Which side of a session a [`SessionKey`] encrypts for. Only the top
/// bit of the IV head distinguishes the two; everything else about the
/// key is shared.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Requester,
    Issuer,
}

/// AES-128-GCM key plus the per-session IV state needed to encrypt
/// outbound frames, derived once via ECDH+HKDF from a NEW exchange.
///
/// The IV is `IvHead(8) || Counter(4)`; `Counter` advances by
/// `ceil(plaintext_len / 8)` on every `encrypt` call. This mirrors the
/// reference implementation's block-stride calculation exactly,
/// including its historical use of an 8-byte stride rather than the
/// 16-byte AES block size; matching the wire behavior of deployed peers
/// takes priority over the theoretically tighter stride. Overflowing the
/// 4-byte counter is a hard failure, not a wraparound.
pub struct SessionKey {
    cipher: Aes128Gcm,
    iv_head: [u8; 8],
    counter: u32,
    /// Counter observed in the last frame accepted from the peer. A
    /// replayed or reordered frame carries a counter no greater than
    /// this and is rejected without touching the cipher.
    last_peer_counter: Option<u32>,
}

impl SessionKey {
    /// Derives a session key from a local ECDH secret and the peer's
    /// public point, given the session's `Salt` and `RequestId`.
    pub fn derive(
        local_secret: &EphemeralSecret,
        peer_public: &PublicKey,
        salt: &[u8],
        request_id: &[u8],
        role: Role,
    ) -> Option<SessionKey> {
        let shared: SharedSecret = local_secret.diffie_hellman(peer_public);
        let hk = Hkdf::<Sha256>::new(Some(salt), shared.raw_secret_bytes().as_slice());
        let mut okm = [0u8; 16];
        hk.expand(request_id, &mut okm).ok()?;
        let cipher = Aes128Gcm::new_from_slice(&okm).ok()?;

        let mut iv_head = [0u8; 8];
        rand::rng().fill_bytes(&mut iv_head);
        match role {
            Role::Requester => iv_head[0] &= 0x7F,
            Role::Issuer => iv_head[0] |= 0x80,
        }

        Some(SessionKey {
            cipher,
            iv_head,
            counter: 0,
            last_peer_counter: None,
        })
    }

    fn next_iv(&mut self, plaintext_len: usize) -> Option<[u8; 12]> {
        let mut iv = [0u8; 12];
        iv[..8].copy_from_slice(&self.iv_head);
        iv[8..].copy_from_slice(&self.counter.to_be_bytes());
        let blocks = plaintext_len.div_ceil(8) as u32;
        self.counter = self.counter.checked_add(blocks)?;
        Some(iv)
    }

    /// Encrypts `plaintext` with `aad` as associated data, advancing the
    /// IV counter. Returns `None` on a counter overflow.
    pub fn encrypt(&mut self, aad: &[u8], plaintext: &[u8]) -> Option<EncryptedFrame> {
        let iv = self.next_iv(plaintext.len())?;
        let sealed = self
            .cipher
            .encrypt(
                Nonce::from_slice(&iv),
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .ok()?;
        let split_at = sealed.len().checked_sub(16)?;
        let (ciphertext, tag) = sealed.split_at(split_at);
        Some(EncryptedFrame {
            iv,
            tag: tag.try_into().ok()?,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Decrypts a frame received from the peer. The peer's own IV is
    /// carried on the wire, so decryption never touches `self.counter`.
    /// Rejects a frame whose counter does not strictly exceed the last
    /// one accepted, closing off replay and reordering.
    pub fn decrypt(&mut self, aad: &[u8], frame: &EncryptedFrame) -> Option<Vec<u8>> {
        let peer_counter = u32::from_be_bytes(frame.iv[8..].try_into().ok()?);
        if let Some(last) = self.last_peer_counter {
            if peer_counter <= last {
                return None;
            }
        }

        let mut sealed = Vec::with_capacity(frame.ciphertext.len() + 16);
        sealed.extend_from_slice(&frame.ciphertext);
        sealed.extend_from_slice(&frame.tag);
        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(&frame.iv),
                Payload {
                    msg: &sealed,
                    aad,
                },
            )
            .ok()?;
        self.last_peer_counter = Some(peer_counter);
        Some(plaintext)
    }
}

/// An encrypted CHALLENGE request/response body: `InitializationVector`,
/// `AuthenticationTag`, and `EncryptedPayload`, in that wire order.
#[derive(Clone, Debug)]
pub struct EncryptedFrame {
    pub iv: [u8; 12],
    pub tag: [u8; 16],
    pub ciphertext: Vec<u8>,
}

impl EncryptedFrame {
    pub fn encode_to(&self, encoder: &mut Encoder<'_>) {
        encoder.prepend_tlv(tt::ENCRYPTED_PAYLOAD, false, |e| {
            e.prepend_bytes(&self.ciphertext);
        });
        encoder.prepend_tlv(tt::AUTHENTICATION_TAG, false, |e| {
            e.prepend_bytes(&self.tag);
        });
        encoder.prepend_tlv(tt::INITIALIZATION_VECTOR, false, |e| {
            e.prepend_bytes(&self.iv);
        });
    }

    /// Decodes a frame from a TLV-VALUE such as a Data packet's Content
    /// (IV, Tag, and Payload laid out back to back, not wrapped in an
    /// outer TLV of their own).
    pub fn decode(value: &[u8]) -> DecodeResult<EncryptedFrame> {
        let mut iv = None;
        let mut tag = None;
        let mut ciphertext = None;
        ndnstack_tlv::ev_decoder::decode_value(
            Decoder::new(value),
            vec![
                ElementDef::fallible(tt::INITIALIZATION_VECTOR, |d| match d.value.try_into() {
                    Ok(v) => {
                        iv = Some(v);
                        true
                    }
                    Err(_) => false,
                })
                .with_order(100),
                ElementDef::fallible(tt::AUTHENTICATION_TAG, |d| match d.value.try_into() {
                    Ok(v) => {
                        tag = Some(v);
                        true
                    }
                    Err(_) => false,
                })
                .with_order(200),
                ElementDef::new(tt::ENCRYPTED_PAYLOAD, |d| ciphertext = Some(d.value.to_vec()))
                    .with_order(300),
            ],
        )?;
        let iv = iv.ok_or(DecodeError::InvalidLength {
            tlv_type: tt::INITIALIZATION_VECTOR,
            length: 0,
        })?;
        let tag = tag.ok_or(DecodeError::InvalidLength {
            tlv_type: tt::AUTHENTICATION_TAG,
            length: 0,
        })?;
        let ciphertext = ciphertext.unwrap_or_default();
        Ok(EncryptedFrame { iv, tag, ciphertext })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndnstack_region::Region;
    use p256::ecdh::EphemeralSecret;
    use rand_core::OsRng;

    #[test]
    fn derives_matching_keys_on_both_sides() {
        let requester_secret = EphemeralSecret::random(&mut OsRng);
        let issuer_secret = EphemeralSecret::random(&mut OsRng);
        let requester_pub = requester_secret.public_key();
        let issuer_pub = issuer_secret.public_key();
        let salt = [7u8; 8];
        let request_id = [9u8; 8];

        let mut requester_key = SessionKey::derive(
            &requester_secret,
            &issuer_pub,
            &salt,
            &request_id,
            Role::Requester,
        )
        .unwrap();
        let mut issuer_key = SessionKey::derive(
            &issuer_secret,
            &requester_pub,
            &salt,
            &request_id,
            Role::Issuer,
        )
        .unwrap();

        let frame = requester_key.encrypt(&request_id, b"hello ndncert").unwrap();
        let plaintext = issuer_key.decrypt(&request_id, &frame).unwrap();
        assert_eq!(plaintext, b"hello ndncert");

        let frame2 = requester_key.encrypt(&request_id, b"second frame").unwrap();
        assert!(issuer_key.decrypt(&request_id, &frame2).is_some());
        assert!(issuer_key.decrypt(&request_id, &frame).is_none());
    }

    #[test]
    fn tampered_aad_fails_to_decrypt() {
        let a_secret = EphemeralSecret::random(&mut OsRng);
        let b_secret = EphemeralSecret::random(&mut OsRng);
        let a_pub = a_secret.public_key();
        let b_pub = b_secret.public_key();
        let salt = [1u8; 8];
        let request_id = [2u8; 8];

        let mut a_key =
            SessionKey::derive(&a_secret, &b_pub, &salt, &request_id, Role::Requester).unwrap();
        let mut b_key =
            SessionKey::derive(&b_secret, &a_pub, &salt, &request_id, Role::Issuer).unwrap();

        let frame = a_key.encrypt(&request_id, b"payload").unwrap();
        assert!(b_key.decrypt(b"wrong-aad", &frame).is_none());
    }

    #[test]
    fn frame_round_trips_through_tlv() {
        let mut storage = [0u8; 128];
        let region = Region::new(&mut storage);
        let frame = EncryptedFrame {
            iv: [1u8; 12],
            tag: [2u8; 16],
            ciphertext: vec![3u8; 20],
        };
        let mut enc = Encoder::new(&region).unwrap();
        frame.encode_to(&mut enc);
        let wire = enc.trim();
        let decoded = EncryptedFrame::decode(wire).unwrap();
        assert_eq!(decoded.iv, frame.iv);
        assert_eq!(decoded.tag, frame.tag);
        assert_eq!(decoded.ciphertext, frame.ciphertext);
    }
}
