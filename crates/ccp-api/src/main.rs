//! # ccp-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the complaint credential service.
//! Binds to a configurable port (default 8080).
//!
//! Set `CCP_LOG_FORMAT=json` for JSON log lines.

use ccp_api::state::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {e}");
        e
    })?;

    let state = ccp_api::bootstrap::bootstrap(&config).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    ccp_api::serve(state, config.port).await?;
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("CCP_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
