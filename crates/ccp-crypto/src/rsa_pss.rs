//! # RSA-PSS Signing and Verification
//!
//! RSASSA-PSS over SHA-256 with MGF1(SHA-256) and a salt the length of the
//! digest (32 bytes). This is the default issuer suite; proofs it produces
//! carry the `RsaSignature2018` type tag.
//!
//! ## Security Invariants
//!
//! - Moduli below [`MIN_RSA_BITS`] are rejected at load time.
//! - Signing input MUST be `&CanonicalBytes`.
//! - Signing uses blinding and fresh salt from `OsRng` on every call, so two
//!   signatures over the same bytes differ. Verification does not depend on
//!   that randomness.
//! - Private keys are never serialized by `Debug` and are zeroized on drop.
//!
//! [`RsaPssPublicKey`] is the verify-only counterpart, loaded from the SPKI
//! PEM that `ccp keygen --public-out` writes.

use ccp_core::CanonicalBytes;
use rand_core::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::pss::{BlindedSigningKey, Signature, VerifyingKey};
use rsa::signature::{Keypair, RandomizedSigner, SignatureEncoding, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Smallest RSA modulus accepted for signing.
pub const MIN_RSA_BITS: usize = 2048;

/// An RSA key pair configured for PSS-SHA256 signing.
pub struct RsaPssKeyPair {
    private_key: RsaPrivateKey,
    signing_key: BlindedSigningKey<Sha256>,
    verifying_key: VerifyingKey<Sha256>,
}

impl RsaPssKeyPair {
    /// Generate a fresh key pair with public exponent 65537.
    ///
    /// `bits` below [`MIN_RSA_BITS`] is rejected before any work is done.
    pub fn generate(bits: usize) -> Result<Self, CryptoError> {
        ensure_min_bits(bits)?;
        let private_key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| CryptoError::InvalidKey(format!("RSA key generation failed: {e}")))?;
        Self::from_private_key(private_key)
    }

    /// Parse a private key from PEM text.
    ///
    /// Accepts PKCS#8 (`BEGIN PRIVATE KEY`) and, for keys exported by older
    /// tooling, PKCS#1 (`BEGIN RSA PRIVATE KEY`).
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let private_key = match RsaPrivateKey::from_pkcs8_pem(pem) {
            Ok(key) => key,
            Err(pkcs8_err) => RsaPrivateKey::from_pkcs1_pem(pem).map_err(|_| {
                CryptoError::InvalidKey(format!("not an RSA private key PEM: {pkcs8_err}"))
            })?,
        };
        Self::from_private_key(private_key)
    }

    fn from_private_key(private_key: RsaPrivateKey) -> Result<Self, CryptoError> {
        private_key
            .validate()
            .map_err(|e| CryptoError::InvalidKey(format!("RSA key failed validation: {e}")))?;
        ensure_min_bits(private_key.n().bits())?;
        let signing_key = BlindedSigningKey::<Sha256>::new(private_key.clone());
        let verifying_key = signing_key.verifying_key();
        Ok(Self {
            private_key,
            signing_key,
            verifying_key,
        })
    }

    /// Modulus size in bits.
    pub fn modulus_bits(&self) -> usize {
        self.private_key.n().bits()
    }

    /// Export the private key as PKCS#8 PEM.
    pub fn to_pkcs8_pem(&self) -> Result<Zeroizing<String>, CryptoError> {
        self.private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| CryptoError::Encoding(e.to_string()))
    }

    /// Export the public key as SPKI PEM.
    pub fn public_key_pem(&self) -> Result<String, CryptoError> {
        self.private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::Encoding(e.to_string()))
    }

    /// Sign canonical bytes, returning the raw signature (modulus-sized).
    pub fn sign(&self, data: &CanonicalBytes) -> Result<Vec<u8>, CryptoError> {
        let signature = self
            .signing_key
            .try_sign_with_rng(&mut OsRng, data.as_bytes())
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        Ok(signature.to_vec())
    }

    /// Check a raw signature against canonical bytes.
    ///
    /// Any malformed signature is simply `false`.
    pub fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> bool {
        verify_pss(&self.verifying_key, data, signature)
    }
}

/// An RSA public key configured for PSS-SHA256 verification only.
pub struct RsaPssPublicKey {
    public_key: RsaPublicKey,
    verifying_key: VerifyingKey<Sha256>,
}

impl RsaPssPublicKey {
    /// Parse a public key from PEM text.
    ///
    /// Accepts SPKI (`BEGIN PUBLIC KEY`) and PKCS#1 (`BEGIN RSA PUBLIC KEY`).
    /// The same modulus floor as for signing keys applies.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let public_key = match RsaPublicKey::from_public_key_pem(pem.trim()) {
            Ok(key) => key,
            Err(spki_err) => RsaPublicKey::from_pkcs1_pem(pem.trim()).map_err(|_| {
                CryptoError::InvalidKey(format!("not an RSA public key PEM: {spki_err}"))
            })?,
        };
        ensure_min_bits(public_key.n().bits())?;
        let verifying_key = VerifyingKey::<Sha256>::new(public_key.clone());
        Ok(Self {
            public_key,
            verifying_key,
        })
    }

    /// Modulus size in bits.
    pub fn modulus_bits(&self) -> usize {
        self.public_key.n().bits()
    }

    /// Export the key as SPKI PEM.
    pub fn public_key_pem(&self) -> Result<String, CryptoError> {
        self.public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::Encoding(e.to_string()))
    }

    /// Check a raw signature against canonical bytes.
    pub fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> bool {
        verify_pss(&self.verifying_key, data, signature)
    }
}

impl std::fmt::Debug for RsaPssPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPssPublicKey")
            .field("modulus_bits", &self.modulus_bits())
            .finish()
    }
}

fn verify_pss(key: &VerifyingKey<Sha256>, data: &CanonicalBytes, signature: &[u8]) -> bool {
    let Ok(signature) = Signature::try_from(signature) else {
        return false;
    };
    key.verify(data.as_bytes(), &signature).is_ok()
}

impl std::fmt::Debug for RsaPssKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPssKeyPair")
            .field("modulus_bits", &self.modulus_bits())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

fn ensure_min_bits(bits: usize) -> Result<(), CryptoError> {
    if bits < MIN_RSA_BITS {
        return Err(CryptoError::KeyTooSmall {
            bits,
            min: MIN_RSA_BITS,
        });
    }
    Ok(())
}
