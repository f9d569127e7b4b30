//! # ccp-crypto — Issuer Key Material
//!
//! Holds the issuer's asymmetric key pair for the process lifetime and
//! exposes exactly two operations on it: sign and verify.
//!
//! ## Suites
//!
//! | Algorithm | Module | Proof type tag |
//! |-----------|--------|----------------|
//! | RSASSA-PSS / SHA-256, >= 2048-bit | [`rsa_pss`] | `RsaSignature2018` |
//! | Ed25519 | [`ed25519`] | `Ed25519Signature2020` |
//!
//! ## Security Invariants
//!
//! - Signing input is always `&CanonicalBytes` from `ccp-core`.
//! - Verification never returns an error, only `true` or `false`.
//! - Private key material is zeroized on drop and redacted in `Debug`.

pub mod ed25519;
pub mod error;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
pub mod key_holder;
pub mod rsa_pss;

pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey};
pub use error::CryptoError;
pub use key_holder::{
    generate_key, load_key, load_public_key_file, parse_key, parse_public_key, write_secret_file,
    GeneratedKey, KeyAlgorithm, KeyHolder, KeySource, LoadedKey, DEFAULT_RSA_BITS,
};
pub use rsa_pss::{RsaPssKeyPair, RsaPssPublicKey, MIN_RSA_BITS};
