//! # Canonical Serialization — JCS Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! that are signed or verified anywhere in the stack.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only ways to
//! construct it are [`CanonicalBytes::new()`] and
//! [`CanonicalBytes::from_value()`], both of which serialize through
//! `serde_jcs` (RFC 8785, JSON Canonicalization Scheme):
//!
//! 1. Object keys sorted by UTF-16 code units at every nesting level.
//! 2. Compact separators, no insignificant whitespace.
//! 3. Floating-point numbers rendered with ECMAScript
//!    `Number.prototype.toString` rules, so `10.0` and `10` canonicalize
//!    identically.
//! 4. Minimal string escaping, UTF-8 output.
//!
//! Integers are written in their exact decimal form. An integer beyond
//! [`MAX_SAFE_INTEGER`] has no exact IEEE 754 double, so an RFC 8785
//! implementation that parses numbers as doubles would produce different
//! bytes for it. Such integers are rejected with
//! [`CanonicalizationError::UnsafeInteger`] rather than signed.
//!
//! Any signer or verifier must accept `&CanonicalBytes`, so a document can
//! never be signed over one byte layout and verified over another.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - Construction always passes through `serde_jcs`.
/// - Logically equal JSON documents produce byte-identical output,
///   independent of key insertion order.
/// - The output is valid UTF-8 and valid JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (for example a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(&value)
    }

    /// Construct canonical bytes from an already-built JSON value tree.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::UnsafeInteger` if any integer in the
    /// tree exceeds [`MAX_SAFE_INTEGER`] in magnitude.
    pub fn from_value(value: &Value) -> Result<Self, CanonicalizationError> {
        check_integers(value)?;
        let s = serde_jcs::to_string(value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Largest integer magnitude an IEEE 754 double represents exactly,
/// `2^53 - 1`.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Reject integers with no exact double representation, at any depth.
fn check_integers(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            let magnitude = n.as_u64().or_else(|| n.as_i64().map(i64::unsigned_abs));
            match magnitude {
                Some(m) if m > MAX_SAFE_INTEGER => {
                    Err(CanonicalizationError::UnsafeInteger(n.to_string()))
                }
                _ => Ok(()),
            }
        }
        Value::Array(items) => items.iter().try_for_each(check_integers),
        Value::Object(map) => map.values().try_for_each(check_integers),
    }
}

/// Name of a JSON value's kind, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_str(value: &Value) -> String {
        let cb = CanonicalBytes::new(value).expect("should canonicalize");
        String::from_utf8(cb.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn simple_object_sorted_compact() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
        assert_eq!(canonical_str(&data), r#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn nested_objects_sorted() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, 2, 1]
        });
        // Array order is preserved, object keys are sorted.
        assert_eq!(
            canonical_str(&data),
            r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#
        );
    }

    #[test]
    fn floats_use_ecmascript_formatting() {
        let data = serde_json::json!({"whole": 10.0, "half": 1.5});
        assert_eq!(canonical_str(&data), r#"{"half":1.5,"whole":10}"#);
    }

    #[test]
    fn unicode_is_not_escaped() {
        let data = serde_json::json!({"name": "Pr\u{e9}sident"});
        assert_eq!(canonical_str(&data), "{\"name\":\"Pr\u{e9}sident\"}");
    }

    #[test]
    fn insertion_order_is_irrelevant() {
        let mut a = serde_json::Map::new();
        a.insert("status".into(), Value::from("open"));
        a.insert("complaint_id".into(), Value::from("44"));
        let mut b = serde_json::Map::new();
        b.insert("complaint_id".into(), Value::from("44"));
        b.insert("status".into(), Value::from("open"));
        assert_eq!(
            CanonicalBytes::new(&Value::Object(a)).unwrap(),
            CanonicalBytes::new(&Value::Object(b)).unwrap()
        );
    }

    #[test]
    fn new_and_from_value_agree() {
        let data = serde_json::json!({"z": [true, null], "a": "x"});
        let via_new = CanonicalBytes::new(&data).unwrap();
        let via_value = CanonicalBytes::from_value(&data).unwrap();
        assert_eq!(via_new, via_value);
    }

    #[test]
    fn struct_serializes_through_jcs() {
        #[derive(Serialize)]
        struct Claim {
            status: &'static str,
            complaint_number: &'static str,
        }
        let cb = CanonicalBytes::new(&Claim {
            status: "open",
            complaint_number: "CYB-44",
        })
        .unwrap();
        assert_eq!(
            cb.as_bytes(),
            br#"{"complaint_number":"CYB-44","status":"open"}"#
        );
        assert_eq!(cb.len(), cb.as_ref().len());
        assert!(!cb.is_empty());
    }

    #[test]
    fn non_string_map_keys_are_rejected() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], 1);
        let result = CanonicalBytes::new(&map);
        assert!(matches!(
            result,
            Err(CanonicalizationError::SerializationFailed(_))
        ));
    }

    #[test]
    fn safe_integer_bounds_accepted() {
        let data = serde_json::json!({
            "max": 9_007_199_254_740_991i64,
            "min": -9_007_199_254_740_991i64
        });
        assert_eq!(
            canonical_str(&data),
            r#"{"max":9007199254740991,"min":-9007199254740991}"#
        );
    }

    #[test]
    fn integers_beyond_double_precision_rejected() {
        for n in [
            9_007_199_254_740_992i64,
            9_007_199_254_740_993,
            -9_007_199_254_740_993,
            i64::MIN,
        ] {
            let result = CanonicalBytes::new(&serde_json::json!({"amount": n}));
            assert!(
                matches!(result, Err(CanonicalizationError::UnsafeInteger(_))),
                "accepted {n}"
            );
        }
        let nested = serde_json::json!({"a": [{"b": u64::MAX}]});
        assert!(matches!(
            CanonicalBytes::from_value(&nested),
            Err(CanonicalizationError::UnsafeInteger(ref s)) if s == "18446744073709551615"
        ));
    }

    #[test]
    fn large_floats_are_not_integers() {
        let data = serde_json::json!({"big": 1.0e21});
        assert_eq!(canonical_str(&data), r#"{"big":1e+21}"#);
    }

    #[test]
    fn value_kind_names() {
        assert_eq!(value_kind(&Value::Null), "null");
        assert_eq!(value_kind(&serde_json::json!([])), "array");
        assert_eq!(value_kind(&serde_json::json!({})), "object");
        assert_eq!(value_kind(&serde_json::json!("s")), "string");
    }
}
