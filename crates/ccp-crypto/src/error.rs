//! # Cryptographic Error Types
//!
//! Every variant here is fatal for the key holder it concerns. Verification
//! never produces a `CryptoError`: a signature that does not check out is a
//! plain `false`.

use thiserror::Error;

/// Errors from key loading and signing.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// No key source yielded key material.
    #[error("signing key unavailable: {0}")]
    KeyUnavailable(String),

    /// Key material was present but could not be parsed or failed validation.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// RSA modulus below the accepted minimum.
    #[error("RSA key too small: {bits} bits, minimum is {min}")]
    KeyTooSmall {
        /// Modulus size of the rejected key.
        bits: usize,
        /// Minimum accepted modulus size.
        min: usize,
    },

    /// The signing primitive itself failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Key material could not be encoded for persistence.
    #[error("key encoding failed: {0}")]
    Encoding(String),

    /// I/O error while reading or persisting key material.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
