//! HTTP error rendering.
//!
//! Every failure leaves the API as `{"error": CODE, "reason": message}` with
//! the status code of the underlying domain error. Server-side failures are
//! logged and rendered with a generic reason.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use tenderbid_core::bid::BidError;
use tenderbid_core::tender::TenderError;
use tenderbid_core::versioning::VersioningError;
use tenderbid_shared::AppError;

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    reason: String,
}

impl ApiError {
    fn new(status: u16, code: &'static str, reason: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            reason,
        }
    }

    /// A 400 with the `VALIDATION_ERROR` code.
    pub fn validation(reason: impl Into<String>) -> Self {
        AppError::Validation(reason.into()).into()
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self::new(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<TenderError> for ApiError {
    fn from(e: TenderError) -> Self {
        Self::new(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<BidError> for ApiError {
    fn from(e: BidError) -> Self {
        Self::new(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<VersioningError> for ApiError {
    fn from(e: VersioningError) -> Self {
        Self::new(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::validation(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::validation(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        Self::validation(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::validation(e.body_text())
    }
}

impl From<axum_extra::extract::QueryRejection> for ApiError {
    fn from(e: axum_extra::extract::QueryRejection) -> Self {
        Self::validation(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let reason = if self.status.is_server_error() {
            error!(code = self.code, error = %self.reason, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.reason
        };

        (
            self.status,
            Json(json!({
                "error": self.code,
                "reason": reason
            })),
        )
            .into_response()
    }
}
