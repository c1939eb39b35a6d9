use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core::deadline::StoreError;
use crate::services::cascade_delete::CascadeError;
use crate::services::phase_chain::ChainLinkError;

pub(crate) const NOT_FOUND_OR_DENIED: &str = "Assessment not found or permission denied";

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }

    /// Deadline overruns surface as 503, everything else from the store as 500.
    pub(crate) fn store(err: StoreError, context: &str) -> Self {
        match err {
            StoreError::Timeout { operation, seconds } => {
                tracing::warn!(operation, seconds, "{context}");
                Self::ServiceUnavailable(format!("{context}: store timed out"))
            }
            StoreError::Database(err) => Self::internal(err, context),
        }
    }

    pub(crate) fn chain_link(err: ChainLinkError, context: &str) -> Self {
        match err {
            ChainLinkError::Store(err) => Self::store(err, context),
            other => Self::BadRequest(other.to_string()),
        }
    }

    pub(crate) fn cascade(err: CascadeError, context: &str) -> Self {
        match err {
            CascadeError::NotFound => Self::NotFound(NOT_FOUND_OR_DENIED.to_string()),
            CascadeError::Store(err) => Self::store(err, context),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let is_unauthorized = matches!(self, Self::Unauthorized(_));
        let detail = match self {
            Self::Unauthorized(message) | Self::Forbidden(message) => message.to_string(),
            Self::BadRequest(message) | Self::NotFound(message) => message,
            Self::ServiceUnavailable(message) => {
                tracing::error!(error = %message, "Service unavailable");
                message
            }
            Self::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                message
            }
        };

        let mut response =
            (status, Json(ErrorResponse { status: status.as_u16(), detail })).into_response();
        if is_unauthorized {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
