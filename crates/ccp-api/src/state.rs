//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. It holds the credential engine, built once at
//! startup around the issuer key.

use std::sync::Arc;

use ccp_crypto::{KeyAlgorithm, KeySource};
use ccp_vc::{CredentialEngine, IssuerProfile};

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// Issuer key algorithm.
    pub key_algorithm: KeyAlgorithm,
    /// Where the issuer key comes from.
    pub key_source: KeySource,
    /// Issuer identity and credential URI settings.
    pub profile: IssuerProfile,
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Issues and verifies credentials with the issuer key.
    pub engine: Arc<CredentialEngine>,
    /// True when the issuer key will not survive a restart.
    pub key_ephemeral: bool,
}

impl AppState {
    /// State around an already-built engine with a persistent key.
    pub fn new(engine: CredentialEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            key_ephemeral: false,
        }
    }
}
