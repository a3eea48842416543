//! API key data models and request/response types.
//!
//! API keys authenticate callers of the service. The raw key is returned
//! exactly once at creation; only its SHA-256 hash is stored, alongside a
//! cosmetic preview for display in list/get responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::validate_name;

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `name`: Human-readable label, 1-100 characters
/// - `description`: Optional free text, up to 500 characters
/// - `is_active`: Whether the key is currently accepted for authentication
/// - `key_hash`: SHA-256 hash of the raw key (64 hex characters)
/// - `key_preview`: Truncated form of the raw key, captured at creation
/// - `created_at`: When the key was created
/// - `last_used`: Last successful authentication, NULL until first use
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    /// Unique identifier for this API key
    pub id: Uuid,

    /// Human-readable name for this key
    pub name: String,

    /// Optional description of what the key is for
    pub description: Option<String>,

    /// Whether this API key is currently active
    ///
    /// Inactive keys are rejected during authentication. This provides a way
    /// to revoke access without deleting the record.
    pub is_active: bool,

    /// SHA-256 hash of the raw API key (64 hex characters)
    ///
    /// When a request comes in with "Bearer abc123", we hash "abc123" and
    /// compare against this column. Immutable once created; updates never
    /// touch it.
    pub key_hash: String,

    /// Cosmetic preview of the raw key (`<first 8>...<last 4>`)
    pub key_preview: String,

    /// Timestamp when this API key was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent successful authentication
    ///
    /// Starts NULL and only ever advances; each successful authentication
    /// sets it to the current time.
    pub last_used: Option<DateTime<Utc>>,
}

/// Request body for creating a new API key.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "CI pipeline",
///   "description": "Key used by the deploy job",
///   "is_active": true
/// }
/// ```
///
/// # Validation
///
/// - `name`: Required, 1-100 characters
/// - `description`: Optional, at most 500 characters
/// - `is_active`: Optional, defaults to true
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,

    pub description: Option<String>,

    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

/// API keys are active unless the caller says otherwise.
fn default_is_active() -> bool {
    true
}

impl CreateApiKeyRequest {
    /// Validate field constraints: name length and description length.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

/// Request body for partially updating an API key.
///
/// Only `name`, `description`, and `is_active` can change; the key hash is
/// immutable. For `description`, absent and null mean different things:
/// absent leaves the stored value alone, an explicit null clears it. The
/// double-Option plus [`some_if_present`] keeps that distinction through
/// deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateApiKeyRequest {
    pub name: Option<String>,

    #[serde(default, deserialize_with = "some_if_present")]
    pub description: Option<Option<String>>,

    pub is_active: Option<bool>,
}

/// Deserialize a field so that JSON null becomes `Some(None)` while a missing
/// field stays `None` (via `#[serde(default)]`).
fn some_if_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UpdateApiKeyRequest {
    /// Validate whichever fields are present.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(Some(description)) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    /// True when the body carries no fields at all (a no-op update).
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_active.is_none()
    }
}

/// Response body for API key endpoints.
///
/// Never includes the raw key or its hash; the preview is the only trace of
/// the secret that survives past creation.
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "CI pipeline",
///   "description": null,
///   "is_active": true,
///   "key_preview": "3f9a1c2b...8e4d",
///   "created_at": "2025-01-15T10:30:00Z",
///   "last_used": null
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub key_preview: String,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

/// Convert database ApiKey to API response.
///
/// Drops the `key_hash` field; hashes never leave the service.
impl From<ApiKey> for ApiKeyResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            description: key.description,
            is_active: key.is_active,
            key_preview: key.key_preview,
            created_at: key.created_at,
            last_used: key.last_used,
        }
    }
}

/// Response body for key creation only.
///
/// Includes the raw `key` in addition to the normal response fields. This is
/// the only time the raw key is ever returned; it cannot be retrieved again.
#[derive(Debug, Serialize)]
pub struct ApiKeyCreatedResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyResponse,

    /// The actual API key - only shown once
    pub key: String,
}

/// Validate a key description: at most 500 characters.
fn validate_description(description: &str) -> Result<(), AppError> {
    if description.chars().count() > 500 {
        return Err(AppError::Validation(
            "description must be at most 500 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_to_active() {
        let request: CreateApiKeyRequest =
            serde_json::from_str(r#"{"name":"Test API Key"}"#).unwrap();
        assert!(request.is_active);
        assert!(request.description.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn create_request_rejects_long_description() {
        let request = CreateApiKeyRequest {
            name: "ok".to_string(),
            description: Some("d".repeat(501)),
            is_active: true,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_distinguishes_absent_null_and_value_for_description() {
        let absent: UpdateApiKeyRequest = serde_json::from_str(r#"{"name":"n"}"#).unwrap();
        assert!(absent.description.is_none());

        let cleared: UpdateApiKeyRequest =
            serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateApiKeyRequest =
            serde_json::from_str(r#"{"description":"deploy key"}"#).unwrap();
        assert_eq!(set.description, Some(Some("deploy key".to_string())));
    }

    #[test]
    fn empty_update_body_is_detected() {
        let empty: UpdateApiKeyRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());

        let deactivate: UpdateApiKeyRequest =
            serde_json::from_str(r#"{"is_active":false}"#).unwrap();
        assert!(!deactivate.is_empty());
        assert_eq!(deactivate.is_active, Some(false));
    }

    #[test]
    fn created_response_flattens_key_alongside_record_fields() {
        let response = ApiKeyCreatedResponse {
            api_key: ApiKeyResponse {
                id: Uuid::nil(),
                name: "Test API Key".to_string(),
                description: None,
                is_active: true,
                key_preview: "abcd1234...wxyz".to_string(),
                created_at: Utc::now(),
                last_used: None,
            },
            key: "raw-secret".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["key"], "raw-secret");
        assert_eq!(json["name"], "Test API Key");
        assert_eq!(json["is_active"], true);
        assert!(json["last_used"].is_null());
    }
}
