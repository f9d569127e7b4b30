//! # Serve Subcommand
//!
//! Runs the credential API with configuration from the environment, as the
//! `ccp-api` binary does. `--port` overrides `PORT`.

use anyhow::{Context, Result};
use clap::Args;

use ccp_api::bootstrap::bootstrap;
use ccp_api::state::AppConfig;

/// Arguments for `ccp serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen port. Overrides `PORT`.
    #[arg(long)]
    pub port: Option<u16>,
}

/// Execute `ccp serve`. Blocks until shutdown.
pub fn run_serve(args: &ServeArgs) -> Result<u8> {
    let mut config = AppConfig::from_env().context("invalid server configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }

    let state = bootstrap(&config).context("server bootstrap failed")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime
        .block_on(ccp_api::serve(state, config.port))
        .with_context(|| format!("server on port {} failed", config.port))?;

    Ok(0)
}
