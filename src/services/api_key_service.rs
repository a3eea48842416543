//! API key store operations.
//!
//! This module owns all persistence for the `api_keys` table: creation with
//! one-time secret issuance, the active-key scan used by authentication,
//! lookups, partial updates, last-used bookkeeping, and deletion.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::api_key::{
    ApiKey, ApiKeyCreatedResponse, ApiKeyResponse, CreateApiKeyRequest, UpdateApiKeyRequest,
};
use crate::security;

const API_KEY_COLUMNS: &str =
    "id, name, description, is_active, key_hash, key_preview, created_at, last_used";

/// Create a new API key.
///
/// # Process
///
/// 1. Validate field constraints (name 1-100, description <= 500)
/// 2. Generate a raw key and hash it
/// 3. Insert the record (hash + preview only, never the raw key)
/// 4. Return the record together with the raw key
///
/// The raw key is only ever present in this response; it cannot be
/// retrieved again.
pub async fn create_api_key(
    pool: &DbPool,
    request: CreateApiKeyRequest,
) -> Result<ApiKeyCreatedResponse, AppError> {
    request.validate()?;

    // Generate the secret and derive everything that gets stored
    let key = security::generate_api_key();
    let key_hash = security::hash_api_key(&key);
    let key_preview = security::key_preview(&key);

    let record = sqlx::query_as::<_, ApiKey>(
        r#"
        INSERT INTO api_keys (name, description, is_active, key_hash, key_preview)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, description, is_active, key_hash, key_preview, created_at, last_used
        "#,
    )
    .bind(&request.name)
    .bind(&request.description)
    .bind(request.is_active)
    .bind(&key_hash)
    .bind(&key_preview)
    .fetch_one(pool)
    .await?;

    Ok(ApiKeyCreatedResponse {
        api_key: record.into(),
        key,
    })
}

/// Fetch all currently active API keys.
///
/// Used by the authentication middleware, which verifies the presented
/// token against each returned hash in turn. Every call re-queries the
/// table; results come back in store-native order. This is a deliberate
/// linear-scan design - O(active keys) verifications per authentication -
/// acceptable at small key counts and documented as the scaling limit.
pub async fn find_active(pool: &DbPool) -> Result<Vec<ApiKey>, AppError> {
    let keys = sqlx::query_as::<_, ApiKey>(&format!(
        "SELECT {API_KEY_COLUMNS} FROM api_keys WHERE is_active = true"
    ))
    .fetch_all(pool)
    .await?;

    Ok(keys)
}

/// List all API keys, newest first.
pub async fn list_api_keys(pool: &DbPool) -> Result<Vec<ApiKeyResponse>, AppError> {
    let keys = sqlx::query_as::<_, ApiKey>(&format!(
        "SELECT {API_KEY_COLUMNS} FROM api_keys ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(keys.into_iter().map(Into::into).collect())
}

/// Fetch a single API key by id.
///
/// Returns `ApiKeyNotFound` if no record has that id. Id format validation
/// happens in the handler before this is called.
pub async fn get_api_key(pool: &DbPool, id: Uuid) -> Result<ApiKeyResponse, AppError> {
    let key = sqlx::query_as::<_, ApiKey>(&format!(
        "SELECT {API_KEY_COLUMNS} FROM api_keys WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::ApiKeyNotFound)?;

    Ok(key.into())
}

/// Partially update an API key.
///
/// Only `name`, `description`, and `is_active` can change; `key_hash` and
/// `key_preview` are immutable once created. Absent fields keep their stored
/// value. For `description`, an explicit JSON null clears the column, which
/// is why it binds as a presence flag plus a nullable value rather than a
/// single COALESCE.
pub async fn update_api_key(
    pool: &DbPool,
    id: Uuid,
    update: UpdateApiKeyRequest,
) -> Result<ApiKeyResponse, AppError> {
    update.validate()?;

    if update.is_empty() {
        // No fields to apply; still report not-found for unknown ids
        return get_api_key(pool, id).await;
    }

    let description_present = update.description.is_some();
    let description_value = update.description.flatten();

    let key = sqlx::query_as::<_, ApiKey>(
        r#"
        UPDATE api_keys
        SET name = COALESCE($2, name),
            description = CASE WHEN $3 THEN $4 ELSE description END,
            is_active = COALESCE($5, is_active)
        WHERE id = $1
        RETURNING id, name, description, is_active, key_hash, key_preview, created_at, last_used
        "#,
    )
    .bind(id)
    .bind(&update.name)
    .bind(description_present)
    .bind(&description_value)
    .bind(update.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::ApiKeyNotFound)?;

    Ok(key.into())
}

/// Record a successful authentication against a key.
///
/// Single-row update, so concurrent authentications with the same key race
/// benignly: the column ends up with one of the contending "now" values and
/// never moves backward in any observable way that matters.
pub async fn touch_last_used(
    pool: &DbPool,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query("UPDATE api_keys SET last_used = $2 WHERE id = $1")
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete an API key.
///
/// Zero rows affected means the id named no record, so a second delete of
/// the same id reports `ApiKeyNotFound` rather than success.
pub async fn delete_api_key(pool: &DbPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::ApiKeyNotFound);
    }

    Ok(())
}
