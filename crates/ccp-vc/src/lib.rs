//! # ccp-vc — Complaint Credentials
//!
//! Builds, signs, and verifies W3C-style Verifiable Credentials attesting to
//! complaint records.
//!
//! ## Flow
//!
//! ```text
//! issue:  claims ─► envelope ─► canonicalize (no proof) ─► sign ─► attach proof
//! verify: document ─► strip proof ─► canonicalize ─► check signature ─► bool
//! ```
//!
//! ## Security Invariants
//!
//! - Issuance returns a signed credential or an error, never an unsigned one.
//! - The signature covers exactly the JCS bytes of the credential minus `proof`.
//! - Verification fails closed: every failure reason collapses to `false` in
//!   [`CredentialEngine::verify`] and [`CredentialEngine::verify_json`].
//! - Envelope structs reject unknown members, so nothing unsigned can be
//!   appended to a verified document.

pub mod claim;
pub mod credential;
pub mod issuer;
pub mod proof;
pub mod verify;

pub use claim::{ClaimMap, ClaimValue, ComplaintClaim};
pub use credential::{
    document_signing_input, parse_credential, Credential, CredentialStatus, Issuer, VcError,
};
pub use issuer::{is_uri_safe_id, CredentialEngine, IssuerProfile};
pub use proof::{Proof, ProofPurpose, ProofType};
pub use verify::{verify_credential, verify_json_document, VerificationFailure};
