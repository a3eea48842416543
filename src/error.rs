//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Missing, malformed, or unrecognized API keys
/// - **Resource Errors**: Requested resources not found or badly identified
/// - **Business Rule Errors**: Duplicate email registrations
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No Authorization header was supplied at all.
    ///
    /// Returns HTTP 401 Unauthorized with a Bearer challenge.
    #[error("Missing API key")]
    MissingApiKey,

    /// An Authorization header was supplied but the bearer token is empty,
    /// blank, or uses the wrong scheme.
    ///
    /// Distinguished from [`AppError::MissingApiKey`] internally even though
    /// both surface as the same 401 response.
    #[error("Invalid API key format")]
    MalformedApiKey,

    /// The supplied API key matched no active key record.
    ///
    /// Deliberately conflates "never existed", "deleted", "deactivated", and
    /// "wrong secret" so callers cannot enumerate which case applies.
    ///
    /// Returns HTTP 401 Unauthorized with a Bearer challenge.
    #[error("Invalid or expired API key")]
    InvalidApiKey,

    /// Requested user does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("User not found")]
    UserNotFound,

    /// Requested API key record does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("API key not found")]
    ApiKeyNotFound,

    /// A path identifier is not a structurally valid UUID.
    ///
    /// This is distinct from not-found: the id could never name a record.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid ID format")]
    InvalidId,

    /// A user with the same email already exists.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Email already registered")]
    DuplicateEmail,

    /// Request body violates a field constraint.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    /// The String contains field-level detail about what was invalid.
    #[error("Validation error")]
    Validation(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `MissingApiKey` / `MalformedApiKey` / `InvalidApiKey` → 401 Unauthorized
/// - `UserNotFound` / `ApiKeyNotFound` → 404 Not Found
/// - `InvalidId` / `DuplicateEmail` → 400 Bad Request
/// - `Validation` → 422 Unprocessable Entity
/// - `Database` → 500 Internal Server Error (hides details from client)
///
/// All 401 responses carry a `WWW-Authenticate: Bearer` challenge header.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::MissingApiKey => {
                (StatusCode::UNAUTHORIZED, "missing_api_key", self.to_string())
            }
            AppError::MalformedApiKey => (
                StatusCode::UNAUTHORIZED,
                "malformed_api_key",
                self.to_string(),
            ),
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found", self.to_string()),
            AppError::ApiKeyNotFound => {
                (StatusCode::NOT_FOUND, "api_key_not_found", self.to_string())
            }
            AppError::InvalidId => (StatusCode::BAD_REQUEST, "invalid_id", self.to_string()),
            AppError::DuplicateEmail => {
                (StatusCode::BAD_REQUEST, "duplicate_email", self.to_string())
            }
            AppError::Validation(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg.clone(),
            ),
            AppError::Database(ref e) => {
                // Log the real cause; the client only sees a generic message
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        if status == StatusCode::UNAUTHORIZED {
            // RFC 6750: unauthenticated responses carry a Bearer challenge
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn auth_errors_map_to_401() {
        assert_eq!(status_of(AppError::MissingApiKey), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::MalformedApiKey),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(AppError::InvalidApiKey), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn auth_errors_carry_bearer_challenge() {
        let response = AppError::InvalidApiKey.into_response();
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }

    #[test]
    fn domain_errors_map_to_client_statuses() {
        assert_eq!(status_of(AppError::UserNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::ApiKeyNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::InvalidId), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::DuplicateEmail), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AppError::Validation("name must not be empty".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn database_errors_hide_details() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
