//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

use p256::ecdsa::signature::{Signer as _, Verifier as _};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey};

use ndnstack_packet::an::sig_type;
use ndnstack_packet::{Name, Signer, Verifier};

/// Maximum length of a DER-encoded ECDSA P-256 signature.
const MAX_DER_SIG_LEN: usize = 72;

/// ECDSA P-256 private key, producing DER-encoded SHA256WithEcdsa
/// signatures.
pub struct EcdsaPrivateKey {
    signing_key: SigningKey,
    key_locator: Option<Vec<u8>>,
}

impl EcdsaPrivateKey {
    pub fn from_signing_key(signing_key: SigningKey) -> EcdsaPrivateKey {
        EcdsaPrivateKey {
            signing_key,
            key_locator: None,
        }
    }

    /// Parses a PKCS#8 PEM-encoded private key.
    pub fn from_pkcs8_pem(pem: &str) -> Option<EcdsaPrivateKey> {
        let signing_key = SigningKey::from_pkcs8_pem(pem).ok()?;
        Some(EcdsaPrivateKey::from_signing_key(signing_key))
    }

    pub fn with_key_locator(mut self, name_value: &[u8]) -> EcdsaPrivateKey {
        self.key_locator = Some(name_value.to_vec());
        self
    }

    pub fn public_key(&self) -> EcdsaPublicKey {
        EcdsaPublicKey {
            verifying_key: *self.signing_key.verifying_key(),
            key_locator: self.key_locator.clone(),
        }
    }

    /// The raw scalar, for key agreement (e.g. ECDH).
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl Signer for EcdsaPrivateKey {
    fn sig_type(&self) -> u8 {
        sig_type::SHA256_WITH_ECDSA
    }

    fn key_locator(&self) -> Option<Name<'_>> {
        let value = self.key_locator.as_deref()?;
        Name::from_value(value).ok()
    }

    fn max_sig_len(&self) -> usize {
        MAX_DER_SIG_LEN
    }

    fn sign(&self, parts: &[&[u8]], out: &mut [u8]) -> Option<usize> {
        let concatenated = concat_parts(parts);
        let sig: Signature = match self.signing_key.try_sign(&concatenated) {
            Ok(sig) => sig,
            Err(err) => {
                tracing::debug!(%err, "ecdsa signing failed");
                return None;
            }
        };
        let der = sig.to_der();
        let bytes = der.as_bytes();
        out.get_mut(..bytes.len())?.copy_from_slice(bytes);
        Some(bytes.len())
    }
}

/// ECDSA P-256 public key, verifying DER-encoded SHA256WithEcdsa
/// signatures.
#[derive(Clone)]
pub struct EcdsaPublicKey {
    verifying_key: VerifyingKey,
    key_locator: Option<Vec<u8>>,
}

impl EcdsaPublicKey {
    pub fn from_verifying_key(verifying_key: VerifyingKey) -> EcdsaPublicKey {
        EcdsaPublicKey {
            verifying_key,
            key_locator: None,
        }
    }

    pub fn with_key_locator(mut self, name_value: &[u8]) -> EcdsaPublicKey {
        self.key_locator = Some(name_value.to_vec());
        self
    }

    /// The raw verifying key, for key agreement (e.g. ECDH) or encoding.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Encodes this key as a DER SubjectPublicKeyInfo, for embedding in a
    /// certificate's Content field.
    pub fn to_public_key_der(&self) -> Option<Vec<u8>> {
        let doc = self.verifying_key.to_public_key_der().ok()?;
        Some(doc.as_bytes().to_vec())
    }

    /// Decodes a DER SubjectPublicKeyInfo, as found in a certificate's
    /// Content field.
    pub fn from_public_key_der(der: &[u8]) -> Option<EcdsaPublicKey> {
        let verifying_key = VerifyingKey::from_public_key_der(der).ok()?;
        Some(EcdsaPublicKey {
            verifying_key,
            key_locator: None,
        })
    }
}

impl Verifier for EcdsaPublicKey {
    fn verify(&self, parts: &[&[u8]], sig: &[u8]) -> bool {
        let Ok(signature) = Signature::from_der(sig) else {
            return false;
        };
        let concatenated = concat_parts(parts);
        self.verifying_key.verify(&concatenated, &signature).is_ok()
    }
}

fn concat_parts(parts: &[&[u8]]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    for part in parts {
        buf.extend_from_slice(part);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    #[test]
    fn signs_and_verifies() {
        let signing_key = SigningKey::random(&mut OsRng);
        let private = EcdsaPrivateKey::from_signing_key(signing_key);
        let public = private.public_key();

        let mut sig = vec![0u8; private.max_sig_len()];
        let len = private.sign(&[b"name", b"payload"], &mut sig).unwrap();
        assert!(public.verify(&[b"name", b"payload"], &sig[..len]));
        assert!(!public.verify(&[b"name", b"tampered"], &sig[..len]));
    }
}
