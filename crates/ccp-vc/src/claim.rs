//! # Claim Values
//!
//! The subject block of a credential is a string-keyed map of [`ClaimValue`]s.
//! The value set is closed: strings, JSON numbers, booleans, nested maps and
//! lists. `null` is not a claim value, so an absent claim is always expressed
//! by omitting the key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An ordered claim map. Key order never affects the signature, since
/// canonicalization sorts keys, but `BTreeMap` keeps debug output stable too.
pub type ClaimMap = BTreeMap<String, ClaimValue>;

/// A single claim value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// Text.
    String(String),
    /// A JSON number (integer or finite float). Integers beyond
    /// `±(2^53 - 1)` fail canonicalization, so they cannot be issued.
    Number(serde_json::Number),
    /// A boolean.
    Bool(bool),
    /// A nested list.
    List(Vec<ClaimValue>),
    /// A nested map.
    Map(ClaimMap),
}

impl From<&str> for ClaimValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ClaimValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ClaimValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl ClaimValue {
    /// The string payload, if this is a string claim.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Claim key reserved for the proof block. The engine strips it from
/// caller-supplied subjects.
pub const RESERVED_PROOF_KEY: &str = "proof";

/// A complaint record as submitted for issuance.
///
/// `id` identifies the credential itself; `user_id` becomes the subject id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintClaim {
    /// Credential identifier, used in the credential and status URIs.
    pub id: String,
    /// The complainant; becomes `credentialSubject.id`.
    pub user_id: String,
    /// Internal complaint identifier.
    pub complaint_id: String,
    /// Human-facing complaint number (e.g. `CYB-44`).
    pub complaint_number: String,
    /// Complaint status at issuance.
    pub status: String,
}

impl ComplaintClaim {
    /// Build the subject claim block.
    pub fn to_subject(&self) -> ClaimMap {
        let mut subject = ClaimMap::new();
        subject.insert("id".into(), self.user_id.as_str().into());
        subject.insert("complaint_id".into(), self.complaint_id.as_str().into());
        subject.insert(
            "complaint_number".into(),
            self.complaint_number.as_str().into(),
        );
        subject.insert("status".into(), self.status.as_str().into());
        subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_each_variant() {
        let map: ClaimMap = serde_json::from_value(serde_json::json!({
            "s": "text",
            "i": 42,
            "f": 1.5,
            "b": true,
            "l": ["a", 1],
            "m": {"inner": false}
        }))
        .unwrap();
        assert_eq!(map["s"], ClaimValue::String("text".into()));
        assert_eq!(map["i"], ClaimValue::from(42i64));
        assert!(matches!(map["f"], ClaimValue::Number(ref n) if n.as_f64() == Some(1.5)));
        assert_eq!(map["b"], ClaimValue::Bool(true));
        assert_eq!(
            map["l"],
            ClaimValue::List(vec![ClaimValue::from("a"), ClaimValue::from(1i64)])
        );
        assert!(matches!(map["m"], ClaimValue::Map(ref m) if m["inner"] == ClaimValue::Bool(false)));
    }

    #[test]
    fn null_is_not_a_claim() {
        let result: Result<ClaimMap, _> = serde_json::from_value(serde_json::json!({"x": null}));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_as_plain_json() {
        let mut map = ClaimMap::new();
        map.insert("status".into(), "open".into());
        map.insert("count".into(), 3i64.into());
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({"count": 3, "status": "open"}));
    }

    #[test]
    fn complaint_subject_shape() {
        let claim = ComplaintClaim {
            id: "c1".into(),
            user_id: "u9".into(),
            complaint_id: "44".into(),
            complaint_number: "CYB-44".into(),
            status: "open".into(),
        };
        let json = serde_json::to_value(claim.to_subject()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "u9",
                "complaint_id": "44",
                "complaint_number": "CYB-44",
                "status": "open"
            })
        );
    }

    #[test]
    fn as_str_only_for_strings() {
        assert_eq!(ClaimValue::from("x").as_str(), Some("x"));
        assert_eq!(ClaimValue::from(true).as_str(), None);
    }
}
