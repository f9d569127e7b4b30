//! # ccp-api — HTTP Service for Complaint Credentials
//!
//! Issues signed W3C Verifiable Credentials for complaint records and
//! verifies credentials presented back to the service.
//!
//! ## API Surface
//!
//! | Route                    | Module                    | Purpose            |
//! |--------------------------|---------------------------|--------------------|
//! | `POST /api/did/create`   | [`routes::credentials`]   | Issue a credential |
//! | `POST /api/did/verify`   | [`routes::credentials`]   | Verify a credential|
//! | `GET /health/liveness`   | this module               | Process is up      |
//! | `GET /health/readiness`  | this module               | Key self-test      |
//! | `GET /openapi.json`      | [`openapi`]               | API description    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → DefaultBodyLimit (1 MiB) → Handler
//! ```

pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Maximum accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::credentials::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — 200 once the issuer key signs and verifies a probe.
///
/// An ephemeral issuer key is still ready, but the body says so: its
/// credentials stop verifying after a restart.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.self_test() {
        Ok(()) if state.key_ephemeral => {
            (StatusCode::OK, "ready (ephemeral key)").into_response()
        }
        Ok(()) => (StatusCode::OK, "ready").into_response(),
        Err(e) => {
            tracing::warn!("Readiness self-test failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "signing key degraded").into_response()
        }
    }
}

/// Bind `0.0.0.0:<port>` and serve until SIGINT or SIGTERM.
pub async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Credential API listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Credential API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, draining connections");
}
