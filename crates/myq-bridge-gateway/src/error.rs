//! Webhook error responses.
//!
//! A failed invocation is reported either as `{"errorMessage": ...}` or as
//! a structured error envelope, depending on what the skill produced.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use myq_bridge_skill::{Failure, SkillError};

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] SkillError);

/// Plain failure body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorMessageBody {
    error_message: &'static str,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::BAD_GATEWAY)
    }

    /// The skill error behind this response.
    #[must_use]
    pub fn skill_error(&self) -> &SkillError {
        &self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(status = status.as_u16(), error = %self.0, "Event failed");

        match self.0.failure() {
            Failure::Message(message) => (
                status,
                Json(ErrorMessageBody {
                    error_message: message,
                }),
            )
                .into_response(),
            Failure::Envelope(envelope) => (status, Json(envelope)).into_response(),
        }
    }
}
