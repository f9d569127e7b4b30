//! # Credential Document
//!
//! The W3C-style credential envelope and its signing input.
//!
//! ## Security Invariant
//!
//! The signing input is the JCS canonical serialization of the credential
//! with the `proof` member removed and nothing else changed. Every struct in
//! the envelope rejects unknown members, so a presented document cannot
//! carry content the signature does not cover.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ccp_core::canonical::value_kind;
use ccp_core::{CanonicalBytes, CanonicalizationError, Timestamp};
use ccp_crypto::CryptoError;

use crate::claim::ClaimMap;
use crate::proof::Proof;

/// Base context every credential starts with.
pub const W3C_CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Base type every credential carries.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Errors during credential issuance.
#[derive(Error, Debug)]
pub enum VcError {
    /// The credential could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The key holder could not sign.
    #[error("signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// The credential id cannot be embedded in the credential URI as is.
    #[error("credential id {0:?} must use only A-Z a-z 0-9 - . _ ~")]
    InvalidCredentialId(String),

    /// The key holder produced a signature it does not itself accept.
    #[error("key holder self-test failed: {0}")]
    SelfTest(String),
}

/// Issuer identity embedded in the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Issuer {
    /// Issuer identifier (a DID).
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Status-list reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialStatus {
    /// Status entry URI.
    pub id: String,
    /// Status scheme tag.
    #[serde(rename = "type")]
    pub status_type: String,
}

/// A complaint credential, signed or unsigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credential {
    /// JSON-LD context URIs, in order.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential URI.
    pub id: String,

    /// `VerifiableCredential` plus the domain subtype.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    /// Issuer identity.
    pub issuer: Issuer,

    /// When the credential was issued.
    #[serde(rename = "issuanceDate")]
    pub issuance_date: Timestamp,

    /// When the credential stops verifying, if it has a validity window.
    #[serde(
        rename = "expirationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<Timestamp>,

    /// Subject claims.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: ClaimMap,

    /// Status-list reference.
    #[serde(rename = "credentialStatus")]
    pub credential_status: CredentialStatus,

    /// The proof, once signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl Credential {
    /// Canonical bytes covered by the proof.
    ///
    /// Serializes the whole credential, removes `proof`, and canonicalizes
    /// the rest. Calling this on a signed or unsigned credential yields the
    /// same bytes.
    pub fn signing_input(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        document_signing_input(&serde_json::to_value(self)?)
    }

    /// Whether `type` contains the given tag.
    pub fn has_type(&self, tag: &str) -> bool {
        self.credential_type.iter().any(|t| t == tag)
    }

    /// Whether the credential's validity window has closed at `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expiration_date.is_some_and(|exp| exp < now)
    }
}

/// Canonical bytes a presented document's proof must cover.
///
/// Works on the document exactly as received: only the top-level `proof`
/// member is removed, so members the typed form would drop or normalize
/// (an explicit `null`, extra fraction digits) stay in the signed bytes.
pub fn document_signing_input(
    document: &serde_json::Value,
) -> Result<CanonicalBytes, CanonicalizationError> {
    let mut unsigned = document
        .as_object()
        .ok_or(CanonicalizationError::NotAnObject(value_kind(document)))?
        .clone();
    unsigned.remove("proof");
    CanonicalBytes::from_value(&serde_json::Value::Object(unsigned))
}

/// Parse a credential out of an untrusted JSON document.
pub fn parse_credential(value: &serde_json::Value) -> Result<Credential, CanonicalizationError> {
    if !value.is_object() {
        return Err(CanonicalizationError::NotAnObject(value_kind(value)));
    }
    Ok(Credential::deserialize(value)?)
}
