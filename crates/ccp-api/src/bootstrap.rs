//! # Startup Bootstrap
//!
//! Reads configuration from the environment and builds the application
//! state. Any key problem stops startup: the server never serves requests
//! with a missing, unreadable or undersized issuer key.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Read configuration** from `PORT` and `CCP_*` variables.
//! 2. **Load signing key** from inline text, a file, a generate-if-missing
//!    path, or (only when explicitly allowed) an ephemeral in-memory key.
//! 3. **Self-test** the key holder with a sign/verify round.
//! 4. **Log banner** with issuer identity and key provenance.
//!
//! ## Environment
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PORT` | `8080` |
//! | `CCP_KEY_ALGORITHM` | `rsa-pss-sha256` |
//! | `CCP_SIGNING_KEY_PEM` | unset |
//! | `CCP_SIGNING_KEY_PATH` | unset |
//! | `CCP_GENERATE_KEY` | `false` |
//! | `CCP_ALLOW_EPHEMERAL_KEY` | `false` |
//! | `CCP_ISSUER_DID` | `did:web:cybercrime-portal.in` |
//! | `CCP_ISSUER_NAME` | `Cybercrime Portal` |
//! | `CCP_BASE_URL` | `https://cybercrime-portal.in` |
//! | `CCP_CREDENTIAL_VALIDITY_DAYS` | unset |

use std::path::PathBuf;

use ccp_crypto::{load_key, CryptoError, KeyAlgorithm, KeySource};
use ccp_vc::{CredentialEngine, IssuerProfile, VcError};
use zeroize::Zeroizing;

use crate::state::{AppConfig, AppState};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors during startup. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// No key source is configured and ephemeral keys are not allowed.
    #[error(
        "no signing key configured: set CCP_SIGNING_KEY_PATH or CCP_SIGNING_KEY_PEM \
         (or CCP_ALLOW_EPHEMERAL_KEY=true for development)"
    )]
    NoKeySource,

    /// A configuration variable has an unusable value.
    #[error("invalid value for {var}: {reason}")]
    InvalidConfig { var: &'static str, reason: String },

    /// The signing key could not be loaded or generated.
    #[error("signing key error: {0}")]
    SigningKey(#[from] CryptoError),

    /// The loaded key failed its sign/verify self-test.
    #[error("signing key self-test failed: {0}")]
    SelfTest(#[from] VcError),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, BootstrapError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BootstrapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(p) => p.trim().parse().map_err(|e| BootstrapError::InvalidConfig {
                var: "PORT",
                reason: format!("{e}"),
            })?,
            None => 8080,
        };

        let key_algorithm = match get("CCP_KEY_ALGORITHM") {
            Some(a) => a
                .parse::<KeyAlgorithm>()
                .map_err(|e| BootstrapError::InvalidConfig {
                    var: "CCP_KEY_ALGORITHM",
                    reason: e.to_string(),
                })?,
            None => KeyAlgorithm::RsaPssSha256,
        };

        let generate = parse_flag("CCP_GENERATE_KEY", get("CCP_GENERATE_KEY"))?;
        let allow_ephemeral =
            parse_flag("CCP_ALLOW_EPHEMERAL_KEY", get("CCP_ALLOW_EPHEMERAL_KEY"))?;

        let key_source = match (get("CCP_SIGNING_KEY_PEM"), get("CCP_SIGNING_KEY_PATH")) {
            (Some(pem), _) => KeySource::Inline(Zeroizing::new(pem)),
            (None, Some(path)) if generate => KeySource::GenerateIfMissing(PathBuf::from(path)),
            (None, Some(path)) => KeySource::File(PathBuf::from(path)),
            (None, None) if allow_ephemeral => KeySource::Ephemeral,
            (None, None) => return Err(BootstrapError::NoKeySource),
        };

        let defaults = IssuerProfile::default();
        let did = get("CCP_ISSUER_DID").unwrap_or(defaults.issuer.id);
        let name = get("CCP_ISSUER_NAME").unwrap_or(defaults.issuer.name);
        let base_url = get("CCP_BASE_URL").unwrap_or(defaults.base_url);
        let mut profile = IssuerProfile::for_issuer(&did, &name, &base_url);
        profile.validity_days = match get("CCP_CREDENTIAL_VALIDITY_DAYS") {
            Some(days) => Some(days.trim().parse().map_err(|e| {
                BootstrapError::InvalidConfig {
                    var: "CCP_CREDENTIAL_VALIDITY_DAYS",
                    reason: format!("{e}"),
                }
            })?),
            None => None,
        };

        Ok(Self {
            port,
            key_algorithm,
            key_source,
            profile,
        })
    }
}

fn parse_flag(var: &'static str, value: Option<String>) -> Result<bool, BootstrapError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(BootstrapError::InvalidConfig {
                var,
                reason: format!("expected true or false, got {v:?}"),
            }),
        },
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Load the issuer key and build the application state.
pub fn bootstrap(config: &AppConfig) -> Result<AppState, BootstrapError> {
    let loaded = load_key(config.key_algorithm, &config.key_source)?;
    let engine = CredentialEngine::new(loaded.holder, config.profile.clone());
    engine.self_test()?;

    log_banner(config, &engine, loaded.ephemeral, loaded.generated);

    let mut state = AppState::new(engine);
    state.key_ephemeral = loaded.ephemeral;
    Ok(state)
}

fn log_banner(config: &AppConfig, engine: &CredentialEngine, ephemeral: bool, generated: bool) {
    let profile = engine.profile();
    tracing::info!("============================================================");
    tracing::info!("  Complaint Credential Service");
    tracing::info!("  Issuer:        {} ({})", profile.issuer.name, profile.issuer.id);
    tracing::info!("  Key ref:       {}", profile.verification_method);
    tracing::info!("  Algorithm:     {}", config.key_algorithm);
    tracing::info!("  Proof type:    {}", engine.proof_type());
    tracing::info!("  Key source:    {:?}", config.key_source);
    if generated && !ephemeral {
        tracing::info!("  Key status:    newly generated and persisted");
    }
    if ephemeral {
        tracing::warn!("  Key status:    EPHEMERAL (development only)");
    }
    match profile.validity_days {
        Some(days) => tracing::info!("  Validity:      {days} days"),
        None => tracing::info!("  Validity:      no expiration"),
    }
    tracing::info!("============================================================");
}
