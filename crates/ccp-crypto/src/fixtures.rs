//! Deterministic PKCS#8 test keys.
//!
//! Available to this crate's tests and, behind the `test-fixtures` feature,
//! to downstream test suites. Never use these keys outside tests.

/// 2048-bit RSA issuer key.
pub const ISSUER_RSA_2048_PEM: &str = include_str!("../testdata/issuer-rsa-2048.pem");

/// A second, unrelated 2048-bit RSA key.
pub const OTHER_RSA_2048_PEM: &str = include_str!("../testdata/other-rsa-2048.pem");

/// 1024-bit RSA key, below the accepted minimum.
pub const WEAK_RSA_1024_PEM: &str = include_str!("../testdata/weak-rsa-1024.pem");

/// Fixed Ed25519 seed, hex encoded.
pub const ED25519_SEED_HEX: &str =
    "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
