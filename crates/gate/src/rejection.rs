//! Terminal rejections produced by the gate.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Why a request was refused.
///
/// Every rejection is answered with `401 Unauthorized` and a JSON body of the
/// form `{"error": "<message>"}`. The message never carries verification
/// detail; the underlying cause is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    /// No `Authorization` header, or an empty one.
    #[error("Authorization header is required")]
    MissingHeader,

    /// The header is not exactly `Bearer <credential>`.
    #[error("Invalid authorization header format")]
    MalformedHeader,

    /// The credential did not verify.
    #[error("Invalid token")]
    InvalidCredential,
}

impl GateRejection {
    /// Short machine-readable name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GateRejection::MissingHeader => "missing_header",
            GateRejection::MalformedHeader => "malformed_header",
            GateRejection::InvalidCredential => "invalid_credential",
        }
    }

    /// HTTP status for this rejection.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

/// Error response JSON.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable rejection message.
    pub error: String,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        let body = ErrorResponse { error: self.to_string() };
        (self.status(), Json(body)).into_response()
    }
}
