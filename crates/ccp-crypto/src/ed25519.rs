//! # Ed25519 Signing and Verification
//!
//! Alternative issuer suite. Proofs produced with it carry the
//! `Ed25519Signature2020` type tag.
//!
//! Key material is a 32-byte seed, exchanged as 64 lowercase hex characters.
//! `Ed25519KeyPair` does not implement `Serialize` and its `Debug` output
//! shows only a public key prefix. [`Ed25519PublicKey`] verifies with the
//! 32-byte public key alone, also exchanged as hex.

use ccp_core::CanonicalBytes;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// An Ed25519 key pair for signing operations.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate a new key pair using the OS CSPRNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand_core::OsRng),
        }
    }

    /// Create a key pair from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse a key pair from a 64-character hex seed. Surrounding
    /// whitespace is ignored so seed files may end with a newline.
    pub fn from_seed_hex(text: &str) -> Result<Self, CryptoError> {
        let bytes = Zeroizing::new(
            hex::decode(text.trim())
                .map_err(|e| CryptoError::InvalidKey(format!("Ed25519 seed is not hex: {e}")))?,
        );
        let seed: &[u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "Ed25519 seed must be 32 bytes (64 hex chars), got {} bytes",
                bytes.len()
            ))
        })?;
        Ok(Self::from_seed(seed))
    }

    /// Export the seed as lowercase hex.
    pub fn seed_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.signing_key.to_bytes()))
    }

    /// The verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// The verifying key as lowercase hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying_key().as_bytes())
    }

    /// Sign canonical bytes, returning the 64-byte signature.
    pub fn sign(&self, data: &CanonicalBytes) -> Vec<u8> {
        self.signing_key.sign(data.as_bytes()).to_bytes().to_vec()
    }

    /// Check a raw signature against canonical bytes. Wrong-length input is
    /// `false`.
    pub fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> bool {
        let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
            return false;
        };
        self.verifying_key()
            .verify(data.as_bytes(), &signature)
            .is_ok()
    }
}

/// An Ed25519 public key for verification only.
#[derive(Debug, Clone)]
pub struct Ed25519PublicKey {
    verifying_key: VerifyingKey,
}

impl Ed25519PublicKey {
    /// Parse a public key from 64 hex characters. Surrounding whitespace is
    /// ignored.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(text.trim()).map_err(|e| {
            CryptoError::InvalidKey(format!("Ed25519 public key is not hex: {e}"))
        })?;
        let bytes: &[u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "Ed25519 public key must be 32 bytes (64 hex chars), got {} bytes",
                bytes.len()
            ))
        })?;
        let verifying_key = VerifyingKey::from_bytes(bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("Ed25519 public key rejected: {e}")))?;
        Ok(Self { verifying_key })
    }

    /// The public key as lowercase hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying_key.as_bytes())
    }

    /// Check a raw signature against canonical bytes.
    pub fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> bool {
        let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
            return false;
        };
        self.verifying_key
            .verify(data.as_bytes(), &signature)
            .is_ok()
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let public = self.public_key_hex();
        write!(f, "Ed25519KeyPair(public={}...)", &public[..16])
    }
}
