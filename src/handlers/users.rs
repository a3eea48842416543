//! User management HTTP handlers.
//!
//! This module implements the user-related API endpoints:
//! - POST /api/v1/users - Create new user
//! - GET /api/v1/users - List all users
//! - GET /api/v1/users/:id - Get user by ID
//! - PUT /api/v1/users/:id - Partially update a user
//! - DELETE /api/v1/users/:id - Delete a user
//!
//! All of these sit behind the API key authentication middleware.

use crate::{
    db::DbPool,
    error::AppError,
    handlers::parse_id,
    models::user::{CreateUserRequest, UpdateUserRequest, UserResponse},
    services::user_service,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Create a new user.
///
/// # Endpoint
///
/// `POST /api/v1/users`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "birth_date": "1990-01-15"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created user
/// - **Error (400)**: Email already registered
/// - **Error (422)**: Name or email violates field constraints
/// - **Error (401)**: Missing, malformed, or invalid API key
pub async fn create_user(
    State(pool): State<DbPool>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::create_user(&pool, request).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users.
///
/// # Endpoint
///
/// `GET /api/v1/users`
///
/// # Response
///
/// - **Success (200 OK)**: Array of users (may be empty)
/// - **Error (401)**: Missing, malformed, or invalid API key
pub async fn list_users(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user_service::list_users(&pool).await?;

    Ok(Json(users))
}

/// Get a specific user by ID.
///
/// # Endpoint
///
/// `GET /api/v1/users/:id`
///
/// # Response
///
/// - **Success (200 OK)**: User details
/// - **Error (400)**: Id is not a valid UUID
/// - **Error (404)**: No user with that id
/// - **Error (401)**: Missing, malformed, or invalid API key
pub async fn get_user(
    State(pool): State<DbPool>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let id = parse_id(&id)?;
    let user = user_service::get_user(&pool, id).await?;

    Ok(Json(user))
}

/// Partially update a user.
///
/// # Endpoint
///
/// `PUT /api/v1/users/:id`
///
/// # Request Body
///
/// Any subset of `name`, `email`, `birth_date`. Changing the email re-checks
/// uniqueness against every other user; keeping the current email is never a
/// conflict with itself.
///
/// # Response
///
/// - **Success (200 OK)**: Updated user
/// - **Error (400)**: Invalid id, or email already registered
/// - **Error (404)**: No user with that id
/// - **Error (422)**: A provided field violates its constraint
/// - **Error (401)**: Missing, malformed, or invalid API key
pub async fn update_user(
    State(pool): State<DbPool>,
    Path(id): Path<String>,
    Json(update): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let id = parse_id(&id)?;
    let user = user_service::update_user(&pool, id, update).await?;

    Ok(Json(user))
}

/// Delete a user.
///
/// # Endpoint
///
/// `DELETE /api/v1/users/:id`
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (400)**: Id is not a valid UUID
/// - **Error (404)**: No user with that id (including a repeated delete)
/// - **Error (401)**: Missing, malformed, or invalid API key
pub async fn delete_user(
    State(pool): State<DbPool>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    user_service::delete_user(&pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
