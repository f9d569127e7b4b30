//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the credential service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Complaint Credential Service",
        version = "0.1.0",
        description = "Issues signed W3C Verifiable Credentials for cybercrime complaint records and verifies presented credentials.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::credentials::create_credential,
        crate::routes::credentials::verify_credential,
    ),
    components(schemas(
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Credential DTOs
        crate::routes::credentials::IssueCredentialRequest,
        crate::routes::credentials::VerifyCredentialRequest,
        crate::routes::credentials::VerificationResponse,
    )),
    tags(
        (name = "credentials", description = "Complaint credential issuance and verification"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
