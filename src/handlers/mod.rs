//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs business logic (database queries, validation)
//! 3. Returns HTTP response (JSON, status code)

/// API key management endpoints
pub mod api_keys;
/// Health and root probes
pub mod health;
/// User management endpoints
pub mod users;

use crate::error::AppError;
use uuid::Uuid;

/// Parse a path identifier into a UUID.
///
/// Rejects structurally invalid ids with `InvalidId` (400) before any store
/// lookup, keeping "could never be an id" distinct from "no such record".
pub fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::InvalidId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_uuids() {
        assert!(parse_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
    }

    #[test]
    fn rejects_non_uuid_ids() {
        assert!(matches!(parse_id("not-a-uuid"), Err(AppError::InvalidId)));
        assert!(matches!(parse_id(""), Err(AppError::InvalidId)));
        assert!(matches!(parse_id("12345"), Err(AppError::InvalidId)));
    }
}
