//! # Issuance Engine
//!
//! [`CredentialEngine`] owns the issuer profile and a shared key holder. It
//! is built once at startup and handed to whoever issues or verifies.
//!
//! Issuance assembles the envelope, canonicalizes it with no proof present,
//! signs those bytes, and attaches the proof. Issuance fails on an id that
//! is not URI-safe, on a claim that cannot be canonicalized, or on a key
//! holder that cannot sign; callers get either a signed credential or an
//! error, never an unsigned document.

use std::sync::Arc;

use ccp_core::{CanonicalBytes, Timestamp};
use ccp_crypto::KeyHolder;

use crate::claim::{ClaimMap, ComplaintClaim, RESERVED_PROOF_KEY};
use crate::credential::{
    Credential, CredentialStatus, Issuer, VcError, VERIFIABLE_CREDENTIAL_TYPE,
    W3C_CREDENTIALS_CONTEXT,
};
use crate::proof::{Proof, ProofType};

/// Whether `id` can be embedded as a URI path segment without escaping.
///
/// Only RFC 3986 unreserved characters (`A-Z a-z 0-9 - . _ ~`) are allowed,
/// and the dot segments `.` and `..` are refused.
pub fn is_uri_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
}

/// Fixed issuer settings applied to every credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerProfile {
    /// Issuer identity embedded in each credential.
    pub issuer: Issuer,
    /// Base URL for credential and status URIs, without trailing slash.
    pub base_url: String,
    /// Key reference written to `proof.verificationMethod`.
    pub verification_method: String,
    /// Context URIs, in order. The W3C base context comes first.
    pub contexts: Vec<String>,
    /// Domain credential subtype, appended after `VerifiableCredential`.
    pub credential_type: String,
    /// Status scheme tag for `credentialStatus.type`.
    pub status_type: String,
    /// Optional validity window in days. When set, `expirationDate` is
    /// written and verification rejects the credential once it passes.
    pub validity_days: Option<u32>,
}

impl Default for IssuerProfile {
    fn default() -> Self {
        Self::for_issuer(
            "did:web:cybercrime-portal.in",
            "Cybercrime Portal",
            "https://cybercrime-portal.in",
        )
    }
}

impl IssuerProfile {
    /// Profile for the given issuer DID, display name and base URL, with
    /// the key reference `<did>#keys-1`.
    pub fn for_issuer(did: &str, name: &str, base_url: &str) -> Self {
        Self {
            issuer: Issuer {
                id: did.to_string(),
                name: name.to_string(),
            },
            base_url: base_url.trim_end_matches('/').to_string(),
            verification_method: format!("{did}#keys-1"),
            contexts: vec![
                W3C_CREDENTIALS_CONTEXT.to_string(),
                "https://www.w3.org/2018/credentials/examples/v1".to_string(),
            ],
            credential_type: "CybercrimeComplaintCredential".to_string(),
            status_type: "CredentialStatusList2020".to_string(),
            validity_days: None,
        }
    }

    /// `<base>/credentials/<id>`
    pub fn credential_uri(&self, id: &str) -> String {
        format!("{}/credentials/{id}", self.base_url)
    }

    /// Status-list reference `<base>/status/<id>`.
    pub fn status_ref(&self, id: &str) -> CredentialStatus {
        CredentialStatus {
            id: format!("{}/status/{id}", self.base_url),
            status_type: self.status_type.clone(),
        }
    }
}

/// Issues and verifies credentials with one issuer key.
#[derive(Clone)]
pub struct CredentialEngine {
    key: Arc<dyn KeyHolder>,
    profile: IssuerProfile,
}

impl std::fmt::Debug for CredentialEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEngine")
            .field("key", &self.key.holder_name())
            .field("algorithm", &self.key.algorithm())
            .field("profile", &self.profile)
            .finish()
    }
}

impl CredentialEngine {
    /// Create an engine around an already-loaded key holder.
    pub fn new(key: Arc<dyn KeyHolder>, profile: IssuerProfile) -> Self {
        Self { key, profile }
    }

    /// The issuer profile.
    pub fn profile(&self) -> &IssuerProfile {
        &self.profile
    }

    /// The shared key holder.
    pub fn key_holder(&self) -> &Arc<dyn KeyHolder> {
        &self.key
    }

    /// Proof type this engine writes.
    pub fn proof_type(&self) -> ProofType {
        ProofType::for_algorithm(self.key.algorithm())
    }

    /// Issue a signed credential.
    ///
    /// `claims` becomes `credentialSubject`. A claim named `proof` is
    /// dropped before signing, since the engine owns that member.
    pub fn issue(
        &self,
        credential_id: &str,
        mut claims: ClaimMap,
        issuer: &Issuer,
        status: CredentialStatus,
    ) -> Result<Credential, VcError> {
        if !is_uri_safe_id(credential_id) {
            return Err(VcError::InvalidCredentialId(credential_id.to_string()));
        }
        if claims.remove(RESERVED_PROOF_KEY).is_some() {
            tracing::warn!(
                credential_id,
                "dropped reserved `proof` claim from credential subject"
            );
        }

        let now = Timestamp::now();
        let mut credential = Credential {
            context: self.profile.contexts.clone(),
            id: self.profile.credential_uri(credential_id),
            credential_type: vec![
                VERIFIABLE_CREDENTIAL_TYPE.to_string(),
                self.profile.credential_type.clone(),
            ],
            issuer: issuer.clone(),
            issuance_date: now,
            expiration_date: self.profile.validity_days.map(|days| now.plus_days(days)),
            credential_subject: claims,
            credential_status: status,
            proof: None,
        };

        let signing_input = credential.signing_input()?;
        let signature = self.key.sign(&signing_input).map_err(|e| {
            tracing::error!(credential_id, error = %e, "credential signing failed");
            e
        })?;
        credential.proof = Some(Proof::new(
            self.proof_type(),
            self.profile.verification_method.clone(),
            &signature,
            now,
        ));

        tracing::info!(
            credential_id = %credential.id,
            proof_type = %self.proof_type(),
            "issued credential"
        );
        Ok(credential)
    }

    /// Issue a credential for a complaint record, using the profile's
    /// issuer and status scheme.
    pub fn issue_complaint(&self, claim: &ComplaintClaim) -> Result<Credential, VcError> {
        self.issue(
            &claim.id,
            claim.to_subject(),
            &self.profile.issuer,
            self.profile.status_ref(&claim.id),
        )
    }

    /// Sign and verify a fixed sample document with the held key.
    pub fn self_test(&self) -> Result<(), VcError> {
        let sample = CanonicalBytes::new(&serde_json::json!({
            "purpose": "key-holder-self-test",
            "issuer": self.profile.issuer.id,
        }))?;
        let signature = self.key.sign(&sample)?;
        if !self.key.verify(&sample, &signature) {
            return Err(VcError::SelfTest(format!(
                "{} rejected its own signature",
                self.key.holder_name()
            )));
        }
        Ok(())
    }
}
