//! # Key Holder Abstraction
//!
//! The issuer's signing key lives behind the [`KeyHolder`] trait. A holder is
//! built once at startup from a [`KeySource`] and shared as
//! `Arc<dyn KeyHolder>`; nothing in the stack reaches for a global key.
//!
//! ## Key Sources
//!
//! - [`KeySource::File`]: PEM (RSA) or hex seed (Ed25519) read from disk.
//! - [`KeySource::Inline`]: the same text supplied directly, typically from
//!   an environment variable in container deployments.
//! - [`KeySource::GenerateIfMissing`]: load the file if it exists, otherwise
//!   generate a key and persist it there before first use.
//! - [`KeySource::Ephemeral`]: in-memory only. Credentials issued under an
//!   ephemeral key stop verifying when the process exits.
//!
//! Verifiers that hold only the issuer's public key use
//! [`parse_public_key`]. The resulting holder verifies but refuses to sign.
//!
//! ## Security Invariants
//!
//! - `KeyHolder` is `Send + Sync` and immutable after construction.
//! - Signing input is `&CanonicalBytes` (never raw bytes).
//! - `verify` never errors: every failure mode is `false`.
//! - Persisted key files are created exclusively, owner-only on unix, and
//!   synced before the key is used.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ccp_core::CanonicalBytes;
use zeroize::Zeroizing;

use crate::ed25519::{Ed25519KeyPair, Ed25519PublicKey};
use crate::error::CryptoError;
use crate::rsa_pss::{RsaPssKeyPair, RsaPssPublicKey};

/// Modulus size used when this crate generates RSA keys.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// Signature algorithm of a key holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// RSASSA-PSS, SHA-256, MGF1(SHA-256), 32-byte salt.
    RsaPssSha256,
    /// Ed25519 (RFC 8032).
    Ed25519,
}

impl KeyAlgorithm {
    /// Configuration name of the algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RsaPssSha256 => "rsa-pss-sha256",
            Self::Ed25519 => "ed25519",
        }
    }
}

impl std::fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KeyAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsa-pss-sha256" | "rsa" => Ok(Self::RsaPssSha256),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(CryptoError::InvalidKey(format!(
                "unknown key algorithm {other:?}, expected rsa-pss-sha256 or ed25519"
            ))),
        }
    }
}

/// Trait for issuer signing backends.
///
/// Implementations must be `Send + Sync` so one holder can serve every
/// request handler concurrently.
pub trait KeyHolder: Send + Sync {
    /// Algorithm this holder signs with.
    fn algorithm(&self) -> KeyAlgorithm;

    /// Sign canonicalized data. Fails only if the key is unusable.
    fn sign(&self, data: &CanonicalBytes) -> Result<Vec<u8>, CryptoError>;

    /// Check a signature against canonicalized data.
    fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> bool;

    /// Public key in its exchange format: SPKI PEM for RSA, hex for Ed25519.
    fn public_key_text(&self) -> Result<String, CryptoError>;

    /// Human-readable name for this holder (for diagnostics/logging).
    fn holder_name(&self) -> &str;
}

impl KeyHolder for RsaPssKeyPair {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::RsaPssSha256
    }

    fn sign(&self, data: &CanonicalBytes) -> Result<Vec<u8>, CryptoError> {
        RsaPssKeyPair::sign(self, data)
    }

    fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> bool {
        RsaPssKeyPair::verify(self, data, signature)
    }

    fn public_key_text(&self) -> Result<String, CryptoError> {
        self.public_key_pem()
    }

    fn holder_name(&self) -> &str {
        "RsaPssKeyPair"
    }
}

impl KeyHolder for Ed25519KeyPair {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Ed25519
    }

    fn sign(&self, data: &CanonicalBytes) -> Result<Vec<u8>, CryptoError> {
        Ok(Ed25519KeyPair::sign(self, data))
    }

    fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> bool {
        Ed25519KeyPair::verify(self, data, signature)
    }

    fn public_key_text(&self) -> Result<String, CryptoError> {
        Ok(self.public_key_hex())
    }

    fn holder_name(&self) -> &str {
        "Ed25519KeyPair"
    }
}

impl KeyHolder for RsaPssPublicKey {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::RsaPssSha256
    }

    fn sign(&self, _data: &CanonicalBytes) -> Result<Vec<u8>, CryptoError> {
        Err(public_only())
    }

    fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> bool {
        RsaPssPublicKey::verify(self, data, signature)
    }

    fn public_key_text(&self) -> Result<String, CryptoError> {
        self.public_key_pem()
    }

    fn holder_name(&self) -> &str {
        "RsaPssPublicKey"
    }
}

impl KeyHolder for Ed25519PublicKey {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Ed25519
    }

    fn sign(&self, _data: &CanonicalBytes) -> Result<Vec<u8>, CryptoError> {
        Err(public_only())
    }

    fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> bool {
        Ed25519PublicKey::verify(self, data, signature)
    }

    fn public_key_text(&self) -> Result<String, CryptoError> {
        Ok(self.public_key_hex())
    }

    fn holder_name(&self) -> &str {
        "Ed25519PublicKey"
    }
}

fn public_only() -> CryptoError {
    CryptoError::KeyUnavailable("only the public key is loaded; signing is not possible".into())
}

// ─── Key sources ─────────────────────────────────────────────────────────

/// Where the issuer key comes from.
#[derive(Clone)]
pub enum KeySource {
    /// Read key text from a file.
    File(PathBuf),
    /// Key text supplied directly.
    Inline(Zeroizing<String>),
    /// Load the file if present, else generate and persist a new key there.
    GenerateIfMissing(PathBuf),
    /// Generate an in-memory key that is never persisted.
    Ephemeral,
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Inline(_) => f.write_str("Inline([REDACTED])"),
            Self::GenerateIfMissing(path) => {
                f.debug_tuple("GenerateIfMissing").field(path).finish()
            }
            Self::Ephemeral => f.write_str("Ephemeral"),
        }
    }
}

/// A key holder together with how it was obtained.
pub struct LoadedKey {
    /// The shared holder.
    pub holder: Arc<dyn KeyHolder>,
    /// True when the key exists only in this process.
    pub ephemeral: bool,
    /// True when the key was generated during this load.
    pub generated: bool,
}

impl std::fmt::Debug for LoadedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedKey")
            .field("holder", &self.holder.holder_name())
            .field("algorithm", &self.holder.algorithm())
            .field("ephemeral", &self.ephemeral)
            .field("generated", &self.generated)
            .finish()
    }
}

/// A freshly generated key and its secret exchange text.
pub struct GeneratedKey {
    /// The holder for the new key.
    pub holder: Arc<dyn KeyHolder>,
    /// PKCS#8 PEM (RSA) or hex seed (Ed25519).
    pub secret: Zeroizing<String>,
}

/// Parse key text for the given algorithm.
pub fn parse_key(algorithm: KeyAlgorithm, text: &str) -> Result<Arc<dyn KeyHolder>, CryptoError> {
    Ok(match algorithm {
        KeyAlgorithm::RsaPssSha256 => Arc::new(RsaPssKeyPair::from_pem(text)?),
        KeyAlgorithm::Ed25519 => Arc::new(Ed25519KeyPair::from_seed_hex(text)?),
    })
}

/// Parse public key text for the given algorithm: SPKI PEM for RSA, hex for
/// Ed25519. The holder verifies only.
pub fn parse_public_key(
    algorithm: KeyAlgorithm,
    text: &str,
) -> Result<Arc<dyn KeyHolder>, CryptoError> {
    Ok(match algorithm {
        KeyAlgorithm::RsaPssSha256 => Arc::new(RsaPssPublicKey::from_pem(text)?),
        KeyAlgorithm::Ed25519 => Arc::new(Ed25519PublicKey::from_hex(text)?),
    })
}

/// Read and parse a public key file written by `ccp keygen --public-out`.
pub fn load_public_key_file(
    algorithm: KeyAlgorithm,
    path: &Path,
) -> Result<Arc<dyn KeyHolder>, CryptoError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CryptoError::KeyUnavailable(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_public_key(algorithm, &text)
}

/// Generate a new key for the given algorithm.
pub fn generate_key(algorithm: KeyAlgorithm) -> Result<GeneratedKey, CryptoError> {
    match algorithm {
        KeyAlgorithm::RsaPssSha256 => {
            let key = RsaPssKeyPair::generate(DEFAULT_RSA_BITS)?;
            let secret = key.to_pkcs8_pem()?;
            Ok(GeneratedKey {
                holder: Arc::new(key),
                secret,
            })
        }
        KeyAlgorithm::Ed25519 => {
            let key = Ed25519KeyPair::generate();
            let secret = key.seed_hex();
            Ok(GeneratedKey {
                holder: Arc::new(key),
                secret,
            })
        }
    }
}

/// Build a key holder from a source.
///
/// Every error returned here is fatal: a service must not start signing
/// without the key it was configured to use.
pub fn load_key(algorithm: KeyAlgorithm, source: &KeySource) -> Result<LoadedKey, CryptoError> {
    match source {
        KeySource::File(path) => {
            let holder = load_key_file(algorithm, path)?;
            tracing::info!(path = %path.display(), %algorithm, "loaded issuer key from file");
            Ok(LoadedKey {
                holder,
                ephemeral: false,
                generated: false,
            })
        }
        KeySource::Inline(text) => {
            let holder = parse_key(algorithm, text)?;
            tracing::info!(%algorithm, "loaded issuer key from inline configuration");
            Ok(LoadedKey {
                holder,
                ephemeral: false,
                generated: false,
            })
        }
        KeySource::GenerateIfMissing(path) => {
            if path.exists() {
                return load_key(algorithm, &KeySource::File(path.clone()));
            }
            let generated = generate_key(algorithm)?;
            write_secret_file(path, &generated.secret)?;
            tracing::info!(path = %path.display(), %algorithm, "generated and persisted new issuer key");
            Ok(LoadedKey {
                holder: generated.holder,
                ephemeral: false,
                generated: true,
            })
        }
        KeySource::Ephemeral => {
            let generated = generate_key(algorithm)?;
            tracing::warn!(
                %algorithm,
                "using EPHEMERAL issuer key; credentials issued now will not verify after restart"
            );
            Ok(LoadedKey {
                holder: generated.holder,
                ephemeral: true,
                generated: true,
            })
        }
    }
}

fn load_key_file(algorithm: KeyAlgorithm, path: &Path) -> Result<Arc<dyn KeyHolder>, CryptoError> {
    let text = Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
        CryptoError::KeyUnavailable(format!("cannot read {}: {e}", path.display()))
    })?);
    parse_key(algorithm, &text)
}

/// Write secret key text to a new file.
///
/// Fails if the file already exists. On unix the file is created with mode
/// 0600. Data is flushed to disk before returning.
pub fn write_secret_file(path: &Path, secret: &str) -> Result<(), CryptoError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(secret.as_bytes())?;
    if !secret.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    file.sync_all()?;
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────
