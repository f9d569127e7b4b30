//! # Canonicalization Invariants
//!
//! The signing input is the JCS form of the credential without its proof.
//! These tests pin that contract across crates: member order never
//! matters, a presented document is signed exactly as received, repeated
//! canonicalization is stable, and the proof never feeds into its own
//! signature.

use ccp_core::CanonicalBytes;
use ccp_crypto::{fixtures, parse_key, KeyAlgorithm};
use ccp_vc::{
    document_signing_input, parse_credential, ComplaintClaim, CredentialEngine, IssuerProfile,
};
use proptest::prelude::*;
use serde::Serialize;
use serde_json::{json, Value};

fn engine() -> CredentialEngine {
    let key = parse_key(KeyAlgorithm::Ed25519, fixtures::ED25519_SEED_HEX).unwrap();
    CredentialEngine::new(key, IssuerProfile::default())
}

fn claim(status: &str) -> ComplaintClaim {
    ComplaintClaim {
        id: "c1".into(),
        user_id: "u9".into(),
        complaint_id: "44".into(),
        complaint_number: "CYB-44".into(),
        status: status.into(),
    }
}

/// A complaint subject with members declared in one order.
#[derive(Serialize)]
struct SubjectForward<'a> {
    id: &'a str,
    complaint_id: &'a str,
    complaint_number: &'a str,
    status: &'a str,
    amount: f64,
}

/// The same members, declared in the opposite order.
#[derive(Serialize)]
struct SubjectBackward<'a> {
    amount: f64,
    status: &'a str,
    complaint_number: &'a str,
    complaint_id: &'a str,
    id: &'a str,
}

#[test]
fn member_order_does_not_change_canonical_bytes() {
    let forward = SubjectForward {
        id: "u9",
        complaint_id: "44",
        complaint_number: "CYB-44",
        status: "open",
        amount: 1.5,
    };
    let backward = SubjectBackward {
        amount: 1.5,
        status: "open",
        complaint_number: "CYB-44",
        complaint_id: "44",
        id: "u9",
    };

    let forward_text = serde_json::to_string(&forward).unwrap();
    let backward_text = serde_json::to_string(&backward).unwrap();
    assert!(forward_text.starts_with(r#"{"id":"#));
    assert!(backward_text.starts_with(r#"{"amount":"#));

    let fa = CanonicalBytes::new(&forward).unwrap();
    let fb = CanonicalBytes::new(&backward).unwrap();
    assert_eq!(fa.as_bytes(), fb.as_bytes());
    assert_eq!(
        fa.as_bytes(),
        br#"{"amount":1.5,"complaint_id":"44","complaint_number":"CYB-44","id":"u9","status":"open"}"#
    );
}

#[test]
fn presented_document_is_signed_as_received() {
    let engine = engine();
    let credential = engine.issue_complaint(&claim("open")).unwrap();
    let document = serde_json::to_value(&credential).unwrap();
    assert_eq!(
        document_signing_input(&document).unwrap(),
        credential.signing_input().unwrap()
    );
    assert!(engine.verify_json(&document));

    // The typed form reads an explicit null as absent; the signed bytes do not.
    let mut with_null = document.clone();
    with_null["expirationDate"] = Value::Null;
    assert_eq!(parse_credential(&with_null).unwrap(), credential);
    assert!(!engine.verify_json(&with_null));
}

#[test]
fn signing_input_excludes_proof() {
    let credential = engine().issue_complaint(&claim("open")).unwrap();
    let input = credential.signing_input().unwrap();
    let text = std::str::from_utf8(input.as_bytes()).unwrap();
    assert!(!text.contains("\"proof\""));
    assert!(!text.contains(&credential.proof.as_ref().unwrap().signature_value));

    let mut unsigned = credential.clone();
    unsigned.proof = None;
    assert_eq!(
        unsigned.signing_input().unwrap().as_bytes(),
        input.as_bytes()
    );
}

#[test]
fn parsed_document_has_same_signing_input() {
    let credential = engine().issue_complaint(&claim("open")).unwrap();
    let parsed = parse_credential(&serde_json::to_value(&credential).unwrap()).unwrap();
    assert_eq!(
        parsed.signing_input().unwrap().as_bytes(),
        credential.signing_input().unwrap().as_bytes()
    );
}

#[test]
fn canonical_form_of_unicode_and_numbers() {
    let value = json!({"name": "शिकायत", "amount": 1.50, "count": 10});
    let bytes = CanonicalBytes::new(&value).unwrap();
    assert_eq!(
        std::str::from_utf8(bytes.as_bytes()).unwrap(),
        r#"{"amount":1.5,"count":10,"name":"शिकायत"}"#
    );
}

proptest! {
    #[test]
    fn canonicalization_is_deterministic(status in "[a-z]{1,12}", number in "CYB-[0-9]{1,6}") {
        let mut c = claim(&status);
        c.complaint_number = number;
        let credential = engine().issue_complaint(&c).unwrap();
        let first = credential.signing_input().unwrap();
        let second = credential.signing_input().unwrap();
        prop_assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn any_status_round_trips(status in "\\PC{1,40}") {
        prop_assume!(!status.trim().is_empty());
        let engine = engine();
        let credential = engine.issue_complaint(&claim(&status)).unwrap();
        let document = serde_json::to_value(&credential).unwrap();
        prop_assert!(engine.verify_json(&document));
    }
}
