//! # Keygen Subcommand
//!
//! Generates an issuer key and persists it with owner-only permissions.
//! RSA keys are written as PKCS#8 PEM, Ed25519 keys as a hex seed.
//! Existing files are never overwritten.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ccp_crypto::{generate_key, write_secret_file, KeyAlgorithm};

/// Arguments for `ccp keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Key algorithm: rsa-pss-sha256 or ed25519.
    #[arg(long, default_value = "rsa-pss-sha256")]
    pub algorithm: KeyAlgorithm,

    /// Path for the private key file. Must not exist yet.
    #[arg(long, short)]
    pub out: PathBuf,

    /// Optional path for the public key (SPKI PEM or hex), as read by
    /// `ccp verify --public-key`.
    #[arg(long)]
    pub public_out: Option<PathBuf>,
}

/// Execute `ccp keygen`.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let generated = generate_key(args.algorithm)
        .with_context(|| format!("failed to generate {} key", args.algorithm))?;

    write_secret_file(&args.out, &generated.secret)
        .with_context(|| format!("failed to write private key: {}", args.out.display()))?;

    let public = generated
        .holder
        .public_key_text()
        .context("failed to encode public key")?;

    if let Some(path) = &args.public_out {
        std::fs::write(path, format!("{}\n", public.trim_end()))
            .with_context(|| format!("failed to write public key: {}", path.display()))?;
    }

    tracing::info!(algorithm = %args.algorithm, path = %args.out.display(), "generated issuer key");

    println!("OK: generated {} issuer key", args.algorithm);
    println!("  Private key: {}", args.out.display());
    match &args.public_out {
        Some(path) => println!("  Public key:  {}", path.display()),
        None => println!("{}", public.trim_end()),
    }

    Ok(0)
}
