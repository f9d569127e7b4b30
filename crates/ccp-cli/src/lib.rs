//! # ccp-cli — Command-Line Interface for Complaint Credentials
//!
//! ## Subcommands
//!
//! - `ccp keygen` — Generate an issuer key (RSA-PSS PEM or Ed25519 seed).
//! - `ccp issue` — Sign a complaint record into a credential.
//! - `ccp verify` — Check a credential against an issuer key.
//! - `ccp serve` — Run the HTTP API.
//!
//! ```bash
//! ccp keygen --algorithm ed25519 --out issuer.key
//! ccp issue --key issuer.key --algorithm ed25519 --claim complaint.json > vc.json
//! ccp verify --key issuer.key --algorithm ed25519 --credential vc.json
//! ```
//!
//! Handlers return the process exit code: 0 success, 2 for a credential
//! that does not verify. Errors map to exit code 1 in `main`.

pub mod credential;
pub mod keygen;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};

/// Exit code for a credential that failed verification.
pub const EXIT_NOT_VERIFIED: u8 = 2;

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON: {}", path.display()))
}
