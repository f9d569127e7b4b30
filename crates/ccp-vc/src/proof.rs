//! # Proof Block
//!
//! The proof object attached to a signed credential. Its shape is rigid
//! (`deny_unknown_fields`) so extra members cannot ride along unsigned.
//!
//! The signature in `signatureValue` is standard base64 (with padding) over
//! the JCS canonical bytes of the credential with `proof` removed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use ccp_core::Timestamp;
use ccp_crypto::KeyAlgorithm;

/// The proof type tag. It doubles as the signature algorithm identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProofType {
    /// RSASSA-PSS / SHA-256 signature.
    RsaSignature2018,
    /// Ed25519 signature.
    Ed25519Signature2020,
    /// Any tag this stack does not implement. Kept so a presented
    /// credential parses and verification can report it precisely.
    Unsupported(String),
}

impl ProofType {
    /// The proof type produced by holders of `algorithm`.
    pub fn for_algorithm(algorithm: KeyAlgorithm) -> Self {
        match algorithm {
            KeyAlgorithm::RsaPssSha256 => Self::RsaSignature2018,
            KeyAlgorithm::Ed25519 => Self::Ed25519Signature2020,
        }
    }

    /// The algorithm this tag names, if supported.
    pub fn algorithm(&self) -> Option<KeyAlgorithm> {
        match self {
            Self::RsaSignature2018 => Some(KeyAlgorithm::RsaPssSha256),
            Self::Ed25519Signature2020 => Some(KeyAlgorithm::Ed25519),
            Self::Unsupported(_) => None,
        }
    }

    /// Wire name of the tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::RsaSignature2018 => "RsaSignature2018",
            Self::Ed25519Signature2020 => "Ed25519Signature2020",
            Self::Unsupported(other) => other,
        }
    }
}

impl From<&str> for ProofType {
    fn from(s: &str) -> Self {
        match s {
            "RsaSignature2018" => Self::RsaSignature2018,
            "Ed25519Signature2020" => Self::Ed25519Signature2020,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProofType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProofType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// The purpose of a proof. Issuance only ever asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The issuer asserts the credential claims are true.
    AssertionMethod,
}

impl std::fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofPurpose::AssertionMethod => write!(f, "assertionMethod"),
        }
    }
}

/// A proof on a credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proof {
    /// Algorithm identifier.
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    /// When the proof was created (UTC, seconds).
    pub created: Timestamp,

    /// Always `assertionMethod`.
    #[serde(rename = "proofPurpose")]
    pub proof_purpose: ProofPurpose,

    /// Reference to the issuer key that produced the signature.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    /// Base64-encoded signature bytes.
    #[serde(rename = "signatureValue")]
    pub signature_value: String,
}

impl Proof {
    /// Build an assertion proof from raw signature bytes.
    pub fn new(
        proof_type: ProofType,
        verification_method: impl Into<String>,
        signature: &[u8],
        created: Timestamp,
    ) -> Self {
        Self {
            proof_type,
            created,
            proof_purpose: ProofPurpose::AssertionMethod,
            verification_method: verification_method.into(),
            signature_value: BASE64.encode(signature),
        }
    }

    /// Decode `signatureValue`. `None` for anything that is not standard
    /// padded base64, or that decodes to nothing.
    pub fn signature_bytes(&self) -> Option<Vec<u8>> {
        BASE64
            .decode(self.signature_value.as_bytes())
            .ok()
            .filter(|bytes| !bytes.is_empty())
    }
}
