//! # Issue and Verify Subcommands
//!
//! Offline counterparts of `POST /api/did/create` and `POST /api/did/verify`,
//! using an issuer key read from a file. Verification also works from the
//! public key alone, as written by `ccp keygen --public-out`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;

use ccp_crypto::{load_key, load_public_key_file, KeyAlgorithm, KeyHolder, KeySource};
use ccp_vc::{is_uri_safe_id, ComplaintClaim, CredentialEngine, IssuerProfile};

use crate::{read_json, EXIT_NOT_VERIFIED};

/// Arguments for `ccp issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Issuer private key file.
    #[arg(long)]
    pub key: PathBuf,

    /// Key algorithm: rsa-pss-sha256 or ed25519.
    #[arg(long, default_value = "rsa-pss-sha256")]
    pub algorithm: KeyAlgorithm,

    /// JSON file with `id`, `user_id`, `complaint_id`, `complaint_number`
    /// and `status`.
    #[arg(long)]
    pub claim: PathBuf,

    /// Issuer DID. Defaults to the portal issuer.
    #[arg(long)]
    pub issuer_did: Option<String>,

    /// Issuer display name.
    #[arg(long)]
    pub issuer_name: Option<String>,

    /// Base URL for credential and status URIs.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Validity window in days. No expiration when omitted.
    #[arg(long)]
    pub validity_days: Option<u32>,

    /// Write the credential here instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Arguments for `ccp verify`. Exactly one of `--key` and `--public-key`
/// is required.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Issuer private key file.
    #[arg(long, required_unless_present = "public_key", conflicts_with = "public_key")]
    pub key: Option<PathBuf>,

    /// Issuer public key file (SPKI PEM or hex, from `keygen --public-out`).
    #[arg(long)]
    pub public_key: Option<PathBuf>,

    /// Key algorithm: rsa-pss-sha256 or ed25519.
    #[arg(long, default_value = "rsa-pss-sha256")]
    pub algorithm: KeyAlgorithm,

    /// Credential JSON file.
    #[arg(long)]
    pub credential: PathBuf,
}

fn engine(key: &Path, algorithm: KeyAlgorithm, profile: IssuerProfile) -> Result<CredentialEngine> {
    let loaded = load_key(algorithm, &KeySource::File(key.to_path_buf()))
        .with_context(|| format!("failed to load issuer key: {}", key.display()))?;
    Ok(CredentialEngine::new(loaded.holder, profile))
}

fn verifier(args: &VerifyArgs) -> Result<Arc<dyn KeyHolder>> {
    match (&args.key, &args.public_key) {
        (Some(_), Some(_)) => bail!("pass either --key or --public-key, not both"),
        (Some(key), None) => Ok(engine(key, args.algorithm, IssuerProfile::default())?
            .key_holder()
            .clone()),
        (None, Some(path)) => load_public_key_file(args.algorithm, path)
            .with_context(|| format!("failed to load issuer public key: {}", path.display())),
        (None, None) => bail!("an issuer key is required: pass --key or --public-key"),
    }
}

fn profile(args: &IssueArgs) -> IssuerProfile {
    let defaults = IssuerProfile::default();
    let did = args.issuer_did.clone().unwrap_or(defaults.issuer.id);
    let name = args.issuer_name.clone().unwrap_or(defaults.issuer.name);
    let base_url = args.base_url.clone().unwrap_or(defaults.base_url);
    let mut profile = IssuerProfile::for_issuer(&did, &name, &base_url);
    profile.validity_days = args.validity_days;
    profile
}

/// Execute `ccp issue`.
pub fn run_issue(args: &IssueArgs) -> Result<u8> {
    let claim: ComplaintClaim = serde_json::from_value(read_json(&args.claim)?)
        .with_context(|| format!("invalid complaint record: {}", args.claim.display()))?;

    for (field, value) in [
        ("id", &claim.id),
        ("user_id", &claim.user_id),
        ("complaint_id", &claim.complaint_id),
        ("complaint_number", &claim.complaint_number),
        ("status", &claim.status),
    ] {
        if value.trim().is_empty() {
            bail!("complaint record field {field} must not be empty");
        }
    }
    if !is_uri_safe_id(&claim.id) {
        bail!("complaint record id {:?} must use only A-Z a-z 0-9 - . _ ~", claim.id);
    }

    let engine = engine(&args.key, args.algorithm, profile(args))?;
    let credential = engine
        .issue_complaint(&claim)
        .context("failed to issue credential")?;
    let json = serde_json::to_string_pretty(&credential).context("failed to encode credential")?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write credential: {}", path.display()))?;
            println!("OK: issued {}", credential.id);
        }
        None => println!("{json}"),
    }

    Ok(0)
}

/// Execute `ccp verify`.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let engine = CredentialEngine::new(verifier(args)?, IssuerProfile::default());
    let document = read_json(&args.credential)?;

    match engine.verify_json_detailed(&document) {
        Ok(()) => {
            println!("OK: credential verified");
            Ok(0)
        }
        Err(reason) => {
            println!("FAIL: credential not verified: {reason}");
            Ok(EXIT_NOT_VERIFIED)
        }
    }
}
