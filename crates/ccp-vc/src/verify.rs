//! # Credential Verification
//!
//! Verification fails closed. Every reason a presented credential can be
//! rejected is a [`VerificationFailure`] variant, and the boolean entry
//! points collapse all of them to `false`. Nothing here panics or returns an
//! error for untrusted input.
//!
//! Checks run in this order: proof present, proof type supported and
//! matching the holder's algorithm, signature decodable, validity window
//! open, signature valid over the proof-stripped canonical bytes. For a
//! JSON document those bytes come from the document as received, not from
//! its re-serialized typed form.

use serde_json::Value;
use thiserror::Error;

use ccp_core::{CanonicalBytes, CanonicalizationError, Timestamp};
use ccp_crypto::KeyHolder;

use crate::credential::{document_signing_input, parse_credential, Credential};
use crate::issuer::CredentialEngine;

/// Why a credential did not verify.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    /// The credential carries no proof.
    #[error("credential has no proof")]
    MissingProof,

    /// `signatureValue` is not valid base64 or is empty.
    #[error("signature value is not decodable")]
    UndecodableSignature,

    /// The proof type is unknown or does not match the issuer key.
    #[error("unsupported proof type: {0}")]
    UnsupportedProofType(String),

    /// The credential's `expirationDate` has passed.
    #[error("credential expired at {0}")]
    Expired(Timestamp),

    /// The credential could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),

    /// The signature does not authenticate the credential content.
    #[error("signature does not match credential content")]
    SignatureMismatch,

    /// The document does not have the credential shape.
    #[error("malformed credential: {0}")]
    Malformed(String),
}

/// Verify a credential against a key holder, reporting the reason on failure.
pub fn verify_credential(
    key: &dyn KeyHolder,
    credential: &Credential,
    now: Timestamp,
) -> Result<(), VerificationFailure> {
    check_proof(key, credential, now, || credential.signing_input())
}

/// Verify an untrusted JSON document, reporting the reason on failure.
///
/// The typed parse only decides shape, proof and validity window. The
/// signature is checked over the document as presented, minus `proof`.
pub fn verify_json_document(
    key: &dyn KeyHolder,
    document: &Value,
    now: Timestamp,
) -> Result<(), VerificationFailure> {
    let credential =
        parse_credential(document).map_err(|e| VerificationFailure::Malformed(e.to_string()))?;
    check_proof(key, &credential, now, || document_signing_input(document))
}

fn check_proof(
    key: &dyn KeyHolder,
    credential: &Credential,
    now: Timestamp,
    signing_input: impl FnOnce() -> Result<CanonicalBytes, CanonicalizationError>,
) -> Result<(), VerificationFailure> {
    let proof = credential
        .proof
        .as_ref()
        .ok_or(VerificationFailure::MissingProof)?;

    match proof.proof_type.algorithm() {
        Some(algorithm) if algorithm == key.algorithm() => {}
        _ => {
            return Err(VerificationFailure::UnsupportedProofType(
                proof.proof_type.to_string(),
            ))
        }
    }

    let signature = proof
        .signature_bytes()
        .ok_or(VerificationFailure::UndecodableSignature)?;

    if let Some(expired_at) = credential.expiration_date.filter(|exp| *exp < now) {
        return Err(VerificationFailure::Expired(expired_at));
    }

    let signing_input =
        signing_input().map_err(|e| VerificationFailure::Canonicalization(e.to_string()))?;

    if key.verify(&signing_input, &signature) {
        Ok(())
    } else {
        Err(VerificationFailure::SignatureMismatch)
    }
}

impl CredentialEngine {
    /// `true` only if the credential carries a valid proof by this engine's key.
    pub fn verify(&self, credential: &Credential) -> bool {
        log_outcome(&credential.id, self.verify_detailed(credential))
    }

    /// Verify a credential, reporting why it failed.
    pub fn verify_detailed(&self, credential: &Credential) -> Result<(), VerificationFailure> {
        verify_credential(self.key_holder().as_ref(), credential, Timestamp::now())
    }

    /// `true` only if the document parses as a credential and verifies.
    pub fn verify_json(&self, document: &Value) -> bool {
        let id = document
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>");
        log_outcome(id, self.verify_json_detailed(document))
    }

    /// Verify an untrusted JSON document, reporting why it failed.
    pub fn verify_json_detailed(&self, document: &Value) -> Result<(), VerificationFailure> {
        verify_json_document(self.key_holder().as_ref(), document, Timestamp::now())
    }
}

fn log_outcome(credential_id: &str, outcome: Result<(), VerificationFailure>) -> bool {
    match outcome {
        Ok(()) => {
            tracing::debug!(credential_id, "credential verified");
            true
        }
        Err(reason) => {
            tracing::warn!(credential_id, %reason, "credential verification failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::claim::{ClaimMap, ComplaintClaim};
    use crate::credential::{CredentialStatus, Issuer};
    use crate::issuer::IssuerProfile;
    use crate::proof::{Proof, ProofType};
    use ccp_crypto::{fixtures, parse_key, Ed25519KeyPair, KeyAlgorithm};

    fn rsa_engine() -> CredentialEngine {
        let key = parse_key(KeyAlgorithm::RsaPssSha256, fixtures::ISSUER_RSA_2048_PEM).unwrap();
        CredentialEngine::new(key, IssuerProfile::default())
    }

    fn issued(engine: &CredentialEngine) -> Credential {
        engine
            .issue_complaint(&ComplaintClaim {
                id: "c1".into(),
                user_id: "u9".into(),
                complaint_id: "44".into(),
                complaint_number: "CYB-44".into(),
                status: "open".into(),
            })
            .unwrap()
    }

    #[test]
    fn issued_credential_verifies() {
        let engine = rsa_engine();
        let cred = issued(&engine);
        assert!(engine.verify(&cred));
        assert_eq!(engine.verify_detailed(&cred), Ok(()));
    }

    #[test]
    fn tampered_subject_fails() {
        let engine = rsa_engine();
        let mut cred = issued(&engine);
        cred.credential_subject.insert("status".into(), "closed".into());
        assert_eq!(
            engine.verify_detailed(&cred),
            Err(VerificationFailure::SignatureMismatch)
        );
    }

    #[test]
    fn tampered_issuer_fails() {
        let engine = rsa_engine();
        let mut cred = issued(&engine);
        cred.issuer.name = "Someone Else".into();
        assert!(!engine.verify(&cred));
    }

    #[test]
    fn tampered_status_fails() {
        let engine = rsa_engine();
        let mut cred = issued(&engine);
        cred.credential_status.id = "https://cybercrime-portal.in/status/c2".into();
        assert!(!engine.verify(&cred));
    }

    #[test]
    fn missing_proof_fails() {
        let engine = rsa_engine();
        let mut cred = issued(&engine);
        cred.proof = None;
        assert_eq!(
            engine.verify_detailed(&cred),
            Err(VerificationFailure::MissingProof)
        );
    }

    #[test]
    fn undecodable_signature_fails() {
        let engine = rsa_engine();
        let mut cred = issued(&engine);
        if let Some(proof) = cred.proof.as_mut() {
            proof.signature_value = "%%% not base64 %%%".into();
        }
        assert_eq!(
            engine.verify_detailed(&cred),
            Err(VerificationFailure::UndecodableSignature)
        );
    }

    #[test]
    fn unknown_proof_type_fails() {
        let engine = rsa_engine();
        let mut cred = issued(&engine);
        if let Some(proof) = cred.proof.as_mut() {
            proof.proof_type = ProofType::Unsupported("JsonWebSignature2020".into());
        }
        assert_eq!(
            engine.verify_detailed(&cred),
            Err(VerificationFailure::UnsupportedProofType(
                "JsonWebSignature2020".into()
            ))
        );
    }

    #[test]
    fn proof_type_must_match_key_algorithm() {
        let engine = rsa_engine();
        let mut cred = issued(&engine);
        if let Some(proof) = cred.proof.as_mut() {
            proof.proof_type = ProofType::Ed25519Signature2020;
        }
        assert!(matches!(
            engine.verify_detailed(&cred),
            Err(VerificationFailure::UnsupportedProofType(_))
        ));
    }

    #[test]
    fn other_issuer_key_fails() {
        let cred = issued(&rsa_engine());
        let other = CredentialEngine::new(
            parse_key(KeyAlgorithm::RsaPssSha256, fixtures::OTHER_RSA_2048_PEM).unwrap(),
            IssuerProfile::default(),
        );
        assert_eq!(
            other.verify_detailed(&cred),
            Err(VerificationFailure::SignatureMismatch)
        );
    }

    #[test]
    fn expired_credential_fails() {
        let engine = CredentialEngine::new(
            Arc::new(Ed25519KeyPair::from_seed(&[5u8; 32])),
            IssuerProfile {
                validity_days: Some(1),
                ..IssuerProfile::default()
            },
        );
        let cred = issued(&engine);
        let key = engine.key_holder().as_ref();
        assert_eq!(verify_credential(key, &cred, cred.issuance_date), Ok(()));

        let later = cred.issuance_date.plus_days(2);
        assert!(matches!(
            verify_credential(key, &cred, later),
            Err(VerificationFailure::Expired(_))
        ));
    }

    #[test]
    fn json_round_trip_verifies() {
        let engine = rsa_engine();
        let json = serde_json::to_value(issued(&engine)).unwrap();
        assert!(engine.verify_json(&json));
    }

    /// The credential's members, declared in reverse of `Credential`.
    #[derive(serde::Serialize)]
    struct ReversedCredential<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        proof: Option<&'a Proof>,
        #[serde(rename = "credentialStatus")]
        status: &'a CredentialStatus,
        #[serde(rename = "credentialSubject")]
        subject: &'a ClaimMap,
        #[serde(rename = "issuanceDate")]
        issuance_date: Timestamp,
        issuer: &'a Issuer,
        #[serde(rename = "type")]
        types: &'a [String],
        id: &'a str,
        #[serde(rename = "@context")]
        context: &'a [String],
    }

    impl<'a> ReversedCredential<'a> {
        fn of(cred: &'a Credential) -> Self {
            Self {
                proof: cred.proof.as_ref(),
                status: &cred.credential_status,
                subject: &cred.credential_subject,
                issuance_date: cred.issuance_date,
                issuer: &cred.issuer,
                types: &cred.credential_type,
                id: &cred.id,
                context: &cred.context,
            }
        }
    }

    #[test]
    fn member_order_does_not_change_signing_input() {
        let engine = rsa_engine();
        let cred = issued(&engine);
        let mut reversed = ReversedCredential::of(&cred);

        let text = serde_json::to_string(&reversed).unwrap();
        assert!(text.starts_with(r#"{"proof":"#));
        assert!(serde_json::to_string(&cred)
            .unwrap()
            .starts_with(r#"{"@context":"#));

        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            document_signing_input(&doc).unwrap(),
            cred.signing_input().unwrap()
        );
        assert_eq!(engine.verify_json_detailed(&doc), Ok(()));

        reversed.proof = None;
        assert_eq!(
            CanonicalBytes::new(&reversed).unwrap(),
            cred.signing_input().unwrap()
        );
    }

    #[test]
    fn json_explicit_null_member_fails() {
        let engine = rsa_engine();
        let mut json = serde_json::to_value(issued(&engine)).unwrap();
        json["expirationDate"] = Value::Null;
        assert_eq!(
            engine.verify_json_detailed(&json),
            Err(VerificationFailure::SignatureMismatch)
        );
        assert!(!engine.verify_json(&json));
    }

    #[test]
    fn json_fractional_second_timestamps_verify() {
        let engine = rsa_engine();
        let mut json = serde_json::to_value(issued(&engine)).unwrap();
        json["issuanceDate"] = Value::from("2026-01-15T12:00:00.123456Z");

        let input = document_signing_input(&json).unwrap();
        let signature = engine.key_holder().sign(&input).unwrap();
        let proof = Proof::new(
            ProofType::RsaSignature2018,
            engine.profile().verification_method.clone(),
            &signature,
            Timestamp::parse("2026-01-15T12:00:00.123456Z").unwrap(),
        );
        json["proof"] = serde_json::to_value(&proof).unwrap();
        assert_eq!(engine.verify_json_detailed(&json), Ok(()));

        // Same instant, different digits: the signed text changed.
        json["issuanceDate"] = Value::from("2026-01-15T12:00:00.123456000Z");
        assert_eq!(
            engine.verify_json_detailed(&json),
            Err(VerificationFailure::SignatureMismatch)
        );
    }

    #[test]
    fn json_extra_member_is_malformed() {
        let engine = rsa_engine();
        let mut json = serde_json::to_value(issued(&engine)).unwrap();
        json["evidence"] = serde_json::json!(["appended after signing"]);
        assert!(matches!(
            engine.verify_json_detailed(&json),
            Err(VerificationFailure::Malformed(_))
        ));
    }

    #[test]
    fn json_unsafe_integer_claim_fails() {
        let engine = rsa_engine();
        let mut json = serde_json::to_value(issued(&engine)).unwrap();
        json["credentialSubject"]["amount"] = Value::from(9_007_199_254_740_993u64);
        assert!(matches!(
            engine.verify_json_detailed(&json),
            Err(VerificationFailure::Canonicalization(_))
        ));
    }

    #[test]
    fn json_non_credentials_are_false() {
        let engine = rsa_engine();
        for doc in [
            serde_json::json!(null),
            serde_json::json!("credential"),
            serde_json::json!(42),
            serde_json::json!({}),
            serde_json::json!({"proof": {"signatureValue": "AAAA"}}),
        ] {
            assert!(!engine.verify_json(&doc), "accepted {doc}");
        }
    }

    #[test]
    fn json_null_proof_is_missing_proof() {
        let engine = rsa_engine();
        let mut json = serde_json::to_value(issued(&engine)).unwrap();
        json["proof"] = Value::Null;
        assert_eq!(
            engine.verify_json_detailed(&json),
            Err(VerificationFailure::MissingProof)
        );
    }

    #[test]
    fn failure_display() {
        assert_eq!(
            VerificationFailure::MissingProof.to_string(),
            "credential has no proof"
        );
        assert!(VerificationFailure::UnsupportedProofType("X".into())
            .to_string()
            .contains('X'));
    }
}
