//! # ccp-core — Foundational Types for the Complaint Credential Stack
//!
//! This crate defines the primitives every other crate signs, verifies,
//! or timestamps with. It depends on no other `ccp-*` crate.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** All signing input flows through
//!    `CanonicalBytes::new()` (RFC 8785 JCS). Signers and verifiers accept
//!    nothing else, so a credential cannot be signed over one serialization
//!    and checked against another.
//!
//! 2. **UTC-only timestamps.** `Timestamp` enforces UTC with Z suffix and
//!    seconds precision, in memory and on the wire.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ccp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, CoreError};
pub use temporal::Timestamp;
