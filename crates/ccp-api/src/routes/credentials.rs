//! # Credential Issuance and Verification
//!
//! Endpoints that turn a complaint record into a signed Verifiable
//! Credential and check credentials presented back to the service.
//!
//! ## Endpoints
//!
//! - `POST /api/did/create` — Issue a credential for a complaint.
//! - `POST /api/did/verify` — Verify a presented credential.
//!
//! Verification never fails with an error status on account of the
//! document itself. A document that is not a credential, or whose proof
//! does not check out, yields `{"verified": false}`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ccp_vc::{is_uri_safe_id, ComplaintClaim, Credential};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, require_text, Validate};
use crate::state::AppState;

/// Upper bound for any single complaint field.
const MAX_FIELD_LEN: usize = 256;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for credential issuance.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueCredentialRequest {
    /// Credential identifier, used in the credential and status URIs.
    /// Limited to URI unreserved characters.
    pub id: String,
    /// Subject (complainant) identifier.
    pub user_id: String,
    /// Internal complaint identifier.
    pub complaint_id: String,
    /// Public complaint reference number.
    pub complaint_number: String,
    /// Complaint status at issuance time.
    pub status: String,
}

impl Validate for IssueCredentialRequest {
    fn validate(&self) -> Result<(), String> {
        require_text("id", &self.id, MAX_FIELD_LEN)?;
        if !is_uri_safe_id(&self.id) {
            return Err("id must use only A-Z a-z 0-9 - . _ ~".to_string());
        }
        require_text("user_id", &self.user_id, MAX_FIELD_LEN)?;
        require_text("complaint_id", &self.complaint_id, MAX_FIELD_LEN)?;
        require_text("complaint_number", &self.complaint_number, MAX_FIELD_LEN)?;
        require_text("status", &self.status, MAX_FIELD_LEN)?;
        Ok(())
    }
}

impl From<IssueCredentialRequest> for ComplaintClaim {
    fn from(req: IssueCredentialRequest) -> Self {
        Self {
            id: req.id,
            user_id: req.user_id,
            complaint_id: req.complaint_id,
            complaint_number: req.complaint_number,
            status: req.status,
        }
    }
}

/// Request body for credential verification.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyCredentialRequest {
    /// The presented credential document.
    pub credential: Option<serde_json::Value>,
}

impl Validate for VerifyCredentialRequest {
    fn validate(&self) -> Result<(), String> {
        match self.credential {
            Some(_) => Ok(()),
            None => Err("credential is required".to_string()),
        }
    }
}

/// Verification outcome.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerificationResponse {
    /// True only when the proof checks out against the issuer key.
    pub verified: bool,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the credentials router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/did/create", post(create_credential))
        .route("/api/did/verify", post(verify_credential))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/did/create — Issue a signed complaint credential.
#[utoipa::path(
    post,
    path = "/api/did/create",
    request_body = IssueCredentialRequest,
    responses(
        (status = 200, description = "Signed credential", body = serde_json::Value),
        (status = 400, description = "Malformed request body", body = crate::error::ErrorBody),
        (status = 422, description = "Missing or invalid fields", body = crate::error::ErrorBody),
        (status = 500, description = "Signing failed", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn create_credential(
    State(state): State<AppState>,
    body: Result<Json<IssueCredentialRequest>, JsonRejection>,
) -> Result<Json<Credential>, AppError> {
    let req = extract_validated_json(body)?;
    let claim = ComplaintClaim::from(req);
    let credential = state.engine.issue_complaint(&claim)?;
    Ok(Json(credential))
}

/// POST /api/did/verify — Verify a presented credential.
#[utoipa::path(
    post,
    path = "/api/did/verify",
    request_body = VerifyCredentialRequest,
    responses(
        (status = 200, description = "Verification outcome", body = VerificationResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ErrorBody),
        (status = 422, description = "No credential in request", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn verify_credential(
    State(state): State<AppState>,
    body: Result<Json<VerifyCredentialRequest>, JsonRejection>,
) -> Result<Json<VerificationResponse>, AppError> {
    let req = extract_json(body)?;
    req.validate().map_err(AppError::Validation)?;
    let verified = match &req.credential {
        Some(document) => state.engine.verify_json(document),
        None => false,
    };
    Ok(Json(VerificationResponse { verified }))
}
