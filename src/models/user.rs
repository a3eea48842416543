//! User data models and API request/response types.
//!
//! This module defines:
//! - `User`: Database entity representing a user record
//! - `CreateUserRequest`: Request body for creating users
//! - `UpdateUserRequest`: Request body for partial updates
//! - `UserResponse`: Response body returned to clients

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. Emails are stored lowercased and carry a
/// UNIQUE constraint; the application also pre-checks uniqueness so it can
/// report a duplicate before attempting the insert.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,

    /// Display name, 1-100 characters
    pub name: String,

    /// Email address, lowercased, unique across all users
    pub email: String,

    /// Birth date (calendar date, no time component)
    pub birth_date: NaiveDate,
}

/// Request body for creating a new user.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "birth_date": "1990-01-15"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
}

impl CreateUserRequest {
    /// Validate field constraints: name length and email syntax.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name)?;
        validate_email(&self.email)
    }
}

/// Request body for partially updating a user.
///
/// Only fields present in the JSON body are applied; absent fields keep
/// their stored value. Every user field is required in storage, so absent
/// and null are equivalent here.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl UpdateUserRequest {
    /// Validate whichever fields are present.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// True when the body carries no fields at all (a no-op update).
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.birth_date.is_none()
    }
}

/// Response body for user endpoints.
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "birth_date": "1990-01-15"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            birth_date: user.birth_date,
        }
    }
}

/// Validate a display name: non-empty, at most 100 characters.
pub fn validate_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    if name.chars().count() > 100 {
        return Err(AppError::Validation(
            "name must be at most 100 characters".to_string(),
        ));
    }
    Ok(())
}

/// Validate email syntax.
///
/// Intentionally lenient: one `@` separating a non-empty local part from a
/// domain that contains a dot, with no whitespace anywhere. Full RFC 5322
/// parsing is out of scope.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let invalid = || AppError::Validation("invalid email address".to_string());

    if email.chars().any(|c| c.is_whitespace()) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    // Domain needs at least one dot with labels on both sides
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}

/// Normalize an email for storage and comparison.
///
/// Uniqueness is case-insensitive, implemented by lowercasing at the edge so
/// the database only ever sees one canonical form.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_emails() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@nodot").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a@x.com.").is_err());
        assert!(validate_email("a b@x.com").is_err());
        assert!(validate_email("a@x@y.com").is_err());
    }

    #[test]
    fn normalizes_email_case() {
        assert_eq!(normalize_email("Ada@Example.COM"), "ada@example.com");
    }

    #[test]
    fn name_length_bounds() {
        assert!(validate_name("A").is_ok());
        assert!(validate_name(&"x".repeat(100)).is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn update_request_treats_absent_fields_as_unchanged() {
        let update: UpdateUserRequest = serde_json::from_str(r#"{"name":"New"}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some("New"));
        assert!(update.email.is_none());
        assert!(update.birth_date.is_none());
        assert!(!update.is_empty());

        let empty: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
