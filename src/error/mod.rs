//! Centralized API error handling for PropVault
//!
//! A single error type for facade responses, with HTTP status code mapping and
//! JSON error bodies. Failures of one request never affect another; each
//! handler turns its own failure into one of these.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::services::valuation::ValuationError;
use crate::session::SessionError;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    /// The gateway does not serve this operation yet
    #[error("Not available yet: {0}")]
    FeatureUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    /// The gateway could not be reached; the client should try again
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in the response
#[derive(Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ApiError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::FeatureUnavailable(_) => "FEATURE_UNAVAILABLE",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApiError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::FeatureUnavailable(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message shown to the user. Transport failures get a generic retry hint
    /// instead of the underlying error text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::ServiceUnavailable(_) => {
                "The service could not be reached. Please try again.".to_string()
            }
            ApiError::FeatureUnavailable(what) => {
                format!("{} is not available yet.", what)
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.user_message();

        match &self {
            ApiError::InternalError(_)
            | ApiError::ServiceUnavailable(_)
            | ApiError::ExternalServiceError(_) => {
                tracing::error!(error = %self, code = %error_code, "Server error occurred");
            }
            ApiError::FeatureUnavailable(_) => {
                tracing::info!(error = %self, code = %error_code, "Gateway feature not deployed");
            }
            _ => {
                tracing::debug!(error = %self, code = %error_code, "Client error occurred");
            }
        }

        let details = match self {
            ApiError::ValidationError(messages) => Some(messages),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: error_code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Network(msg) => ApiError::ServiceUnavailable(msg),
            GatewayError::Validation { messages, .. } => ApiError::ValidationError(messages),
            GatewayError::NotFound(path) => ApiError::NotFound(path),
            GatewayError::NotDeployed(path) => ApiError::FeatureUnavailable(path),
            GatewayError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            GatewayError::Upstream { status, message } => {
                ApiError::ExternalServiceError(format!("gateway returned {}: {}", status, message))
            }
            GatewayError::Decode(msg) => ApiError::ExternalServiceError(msg),
        }
    }
}

impl From<ValuationError> for ApiError {
    fn from(err: ValuationError) -> Self {
        match err {
            ValuationError::InsufficientTokens { .. } | ValuationError::PropertyNotOpen(_) => {
                ApiError::Conflict(err.to_string())
            }
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Persistence(msg) => ApiError::InternalError(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        ApiError::ValidationError(messages)
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::NotFound("x".to_string()).error_code(), "NOT_FOUND");
        assert_eq!(
            ApiError::FeatureUnavailable("x".to_string()).error_code(),
            "FEATURE_UNAVAILABLE"
        );
        assert_eq!(
            ApiError::ValidationError(vec![]).error_code(),
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_not_deployed_is_distinct_from_not_found() {
        let not_found: ApiError = GatewayError::NotFound("/properties/1".to_string()).into();
        let not_deployed: ApiError =
            GatewayError::NotDeployed("/properties/1/status".to_string()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_deployed.status_code(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_network_failure_hides_transport_detail() {
        let err: ApiError = GatewayError::Network("connection refused".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.user_message().contains("try again"));
        assert!(!err.user_message().contains("refused"));
    }

    #[test]
    fn test_validation_messages_are_joined() {
        let err = ApiError::ValidationError(vec![
            "amount: too small".to_string(),
            "email: invalid".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation error: amount: too small; email: invalid"
        );
    }
}
