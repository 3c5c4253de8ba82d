//! RPC error type and HTTP status mapping.
//!
//! Taxonomy: validation → 400, unknown ids → 404, conflicts → 409, expired
//! links → 410, failed collaborators → 502. Every error body is
//! `{"error": {"code", "message"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use zid_verification::VerificationError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{0}")]
    Workflow(#[from] VerificationError),

    #[error("missing x-zid-principal header")]
    MissingPrincipal,

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    /// Stable machine-readable code for the response body.
    fn code(&self) -> &'static str {
        match self {
            Self::MissingPrincipal => "missing_principal",
            Self::Server(_) => "server_error",
            Self::Workflow(e) => match e {
                VerificationError::RecordNotFound(_) => "record_not_found",
                VerificationError::TokenNotFound(_) => "token_not_found",
                VerificationError::DuplicateRequest(_) => "duplicate_request",
                VerificationError::AlreadyVerified(_) => "already_verified",
                VerificationError::TokenAlreadyConsumed(_) => "token_already_consumed",
                VerificationError::RecordLocked(_) => "record_locked",
                VerificationError::InvalidTransition { .. } => "invalid_transition",
                VerificationError::TokenExpired(_) => "token_expired",
                VerificationError::InvalidEmail(_) => "invalid_email",
                VerificationError::InvalidAction(_) => "invalid_action",
                VerificationError::InvalidIdentifier(_) => "invalid_identifier",
                VerificationError::NotificationDispatchFailed(_) => "notification_failed",
                VerificationError::Store(_) => "store_unavailable",
            },
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::MissingPrincipal => StatusCode::BAD_REQUEST,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Workflow(e) => match e {
                VerificationError::RecordNotFound(_) | VerificationError::TokenNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                VerificationError::DuplicateRequest(_)
                | VerificationError::AlreadyVerified(_)
                | VerificationError::TokenAlreadyConsumed(_)
                | VerificationError::RecordLocked(_)
                | VerificationError::InvalidTransition { .. } => StatusCode::CONFLICT,
                VerificationError::TokenExpired(_) => StatusCode::GONE,
                VerificationError::InvalidEmail(_)
                | VerificationError::InvalidAction(_)
                | VerificationError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
                VerificationError::NotificationDispatchFailed(_)
                | VerificationError::Store(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}
