//! API key management HTTP handlers.
//!
//! This module implements the key-related API endpoints:
//! - POST /api/v1/api-keys - Create new key (unauthenticated bootstrap path)
//! - GET /api/v1/api-keys - List all keys
//! - GET /api/v1/api-keys/:id - Get key by ID
//! - PUT /api/v1/api-keys/:id - Partially update a key
//! - DELETE /api/v1/api-keys/:id - Delete a key

use crate::{
    db::DbPool,
    error::AppError,
    handlers::parse_id,
    models::api_key::{
        ApiKeyCreatedResponse, ApiKeyResponse, CreateApiKeyRequest, UpdateApiKeyRequest,
    },
    services::api_key_service,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Create a new API key.
///
/// # Endpoint
///
/// `POST /api/v1/api-keys`
///
/// # Authentication
///
/// None. This is the bootstrap path: the first key has to come from
/// somewhere before any key exists to authenticate with.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Test API Key",
///   "description": "optional",
///   "is_active": true
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created key, including the raw
///   `key` (shown this once only) and its `key_preview`
/// - **Error (422)**: Name or description violates field constraints
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "Test API Key",
///   "description": null,
///   "is_active": true,
///   "key_preview": "3f9a1c2b...8e4d",
///   "created_at": "2025-01-15T10:30:00Z",
///   "last_used": null,
///   "key": "3f9a1c2b...full secret...8e4d"
/// }
/// ```
pub async fn create_api_key(
    State(pool): State<DbPool>,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created: ApiKeyCreatedResponse =
        api_key_service::create_api_key(&pool, request).await?;

    tracing::info!(api_key_id = %created.api_key.id, "API key created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// List all API keys, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/api-keys`
///
/// # Authentication
///
/// Requires valid API key.
///
/// # Response
///
/// - **Success (200 OK)**: Array of keys; previews only, never secrets
/// - **Error (401)**: Missing, malformed, or invalid API key
pub async fn list_api_keys(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<ApiKeyResponse>>, AppError> {
    let keys = api_key_service::list_api_keys(&pool).await?;

    Ok(Json(keys))
}

/// Get a specific API key by ID.
///
/// # Endpoint
///
/// `GET /api/v1/api-keys/:id`
///
/// # Response
///
/// - **Success (200 OK)**: Key details (preview only, no secret)
/// - **Error (400)**: Id is not a valid UUID
/// - **Error (404)**: No key with that id
/// - **Error (401)**: Missing, malformed, or invalid API key
pub async fn get_api_key(
    State(pool): State<DbPool>,
    Path(id): Path<String>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let id = parse_id(&id)?;
    let key = api_key_service::get_api_key(&pool, id).await?;

    Ok(Json(key))
}

/// Partially update an API key.
///
/// # Endpoint
///
/// `PUT /api/v1/api-keys/:id`
///
/// # Request Body
///
/// Any subset of `name`, `description`, `is_active`. The secret hash can
/// never be changed. Setting `"description": null` clears it; omitting
/// `description` leaves it alone.
///
/// # Response
///
/// - **Success (200 OK)**: Updated key
/// - **Error (400)**: Id is not a valid UUID
/// - **Error (404)**: No key with that id
/// - **Error (422)**: A provided field violates its constraint
/// - **Error (401)**: Missing, malformed, or invalid API key
pub async fn update_api_key(
    State(pool): State<DbPool>,
    Path(id): Path<String>,
    Json(update): Json<UpdateApiKeyRequest>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let id = parse_id(&id)?;
    let key = api_key_service::update_api_key(&pool, id, update).await?;

    Ok(Json(key))
}

/// Delete an API key.
///
/// # Endpoint
///
/// `DELETE /api/v1/api-keys/:id`
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (400)**: Id is not a valid UUID
/// - **Error (404)**: No key with that id (including a repeated delete)
/// - **Error (401)**: Missing, malformed, or invalid API key
pub async fn delete_api_key(
    State(pool): State<DbPool>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    api_key_service::delete_api_key(&pool, id).await?;

    tracing::info!(api_key_id = %id, "API key deleted");

    Ok(StatusCode::NO_CONTENT)
}
