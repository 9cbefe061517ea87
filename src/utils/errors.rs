//! Error handling for EventFlow
//!
//! This module defines the main error type used throughout the application
//! and the mapping from error variants to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Main error type for the EventFlow application
#[derive(Error, Debug)]
pub enum EventFlowError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Malformed request body: {0}")]
    JsonRejection(#[from] axum::extract::rejection::JsonRejection),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid or expired authentication token")]
    InvalidToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is banned")]
    AccountBanned,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User with email `{0}` already exists")]
    EmailExists(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Guest not found: {guest_id}")]
    GuestNotFound { guest_id: i64 },

    #[error("Report not found: {report_id}")]
    ReportNotFound { report_id: i64 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for EventFlow operations
pub type Result<T> = std::result::Result<T, EventFlowError>;

impl From<argon2::password_hash::Error> for EventFlowError {
    fn from(err: argon2::password_hash::Error) -> Self {
        EventFlowError::PasswordHash(err.to_string())
    }
}

impl EventFlowError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            EventFlowError::Validation(_)
            | EventFlowError::JsonRejection(_)
            | EventFlowError::InvalidInput(_)
            | EventFlowError::InvalidCredentials
            | EventFlowError::EmailExists(_)
            | EventFlowError::InvalidStateTransition { .. } => StatusCode::BAD_REQUEST,
            EventFlowError::MissingToken | EventFlowError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            EventFlowError::AccountBanned | EventFlowError::PermissionDenied(_) => {
                StatusCode::FORBIDDEN
            }
            EventFlowError::UserNotFound { .. }
            | EventFlowError::EventNotFound { .. }
            | EventFlowError::GuestNotFound { .. }
            | EventFlowError::ReportNotFound { .. } => StatusCode::NOT_FOUND,
            EventFlowError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EventFlowError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failure details stay in the logs, not in the response body.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Internal error while handling request");
            return (status, Json(json!({ "error": "Internal error" }))).into_response();
        }

        // Validator failures carry a per-field error map.
        if let EventFlowError::Validation(errors) = &self {
            let mut fields = serde_json::Map::new();
            for (field, errs) in errors.field_errors() {
                let codes: Vec<serde_json::Value> = errs
                    .iter()
                    .map(|e| serde_json::Value::String(e.code.to_string()))
                    .collect();
                fields.insert(field.to_string(), serde_json::Value::Array(codes));
            }
            let body = json!({ "error": "Input validation failed", "fields": fields });
            return (status, Json(body)).into_response();
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            EventFlowError::MissingToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            EventFlowError::PermissionDenied("not the owner".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EventFlowError::EventNotFound { event_id: 1 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EventFlowError::InvalidStateTransition {
                from: "DRAFT".to_string(),
                to: "CANCELLED".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EventFlowError::Config("missing secret".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_argon2_error_conversion() {
        let err: EventFlowError = argon2::password_hash::Error::Password.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
