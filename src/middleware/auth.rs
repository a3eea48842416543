//! API key authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the bearer token from the Authorization header
//! 2. Verify it against the stored hashes of all active API keys
//! 3. Record the successful use and inject authentication context
//! 4. Reject unauthorized requests with HTTP 401

use crate::{db::DbPool, error::AppError, security, services::api_key_service};
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use uuid::Uuid;

/// Authentication context attached to authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers to know which key made the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated API key
    pub api_key_id: Uuid,

    /// Name of the authenticated API key
    pub key_name: String,
}

/// Extract the bearer token from an Authorization header value.
///
/// The two failure cases are kept distinct even though both surface as 401:
///
/// - `None` (no header at all) → `MissingApiKey`
/// - A header that is not valid UTF-8, is not `Bearer <token>`, or whose
///   token is empty or blank → `MalformedApiKey`
pub fn parse_bearer(header: Option<&HeaderValue>) -> Result<&str, AppError> {
    let header = header.ok_or(AppError::MissingApiKey)?;

    // A header was supplied, so from here on every failure is malformed,
    // including bytes that do not decode as UTF-8
    let header = header.to_str().map_err(|_| AppError::MalformedApiKey)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AppError::MalformedApiKey)?;

    if token.trim().is_empty() {
        return Err(AppError::MalformedApiKey);
    }

    Ok(token)
}

/// API key authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <key>` header from request
/// 2. Fetch all active API key records
/// 3. Verify the presented key against each stored hash in turn
/// 4. On first match: set that key's `last_used` to now, inject
///    `AuthContext` into the request, call the next handler
/// 5. If nothing matches: return 401 Unauthorized
///
/// # Security
///
/// A failed scan always produces the same `InvalidApiKey` error, whether the
/// key never existed, was deleted, was deactivated, or is simply wrong.
/// Nothing in the response distinguishes those cases.
///
/// # Performance
///
/// This is a linear scan: one SHA-256 per active key per request. Fine for
/// the small key sets this service is built for; an index over a derived
/// lookup value would be the next step if key counts grow.
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool injected by Axum
/// * `request` - Incoming HTTP request (mutable to add extensions)
/// * `next` - Next middleware/handler in the chain
///
/// # Returns
///
/// - `Ok(Response)` if authenticated successfully (calls next handler)
/// - `Err(AppError::...)` on any authentication failure (returns 401)
pub async fn auth_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Step 1: Extract the bearer token
    let api_key = parse_bearer(request.headers().get("Authorization"))?;

    // Step 2: Scan the active keys for a hash match
    let record = api_key_service::find_active(&pool)
        .await?
        .into_iter()
        .find(|record| security::verify_api_key(api_key, &record.key_hash))
        .ok_or(AppError::InvalidApiKey)?;

    // Step 3: Record the successful use before the request proceeds.
    // Concurrent authentications with the same key may race here;
    // last-write-wins on this single column is acceptable.
    api_key_service::touch_last_used(&pool, record.id, Utc::now()).await?;

    // Step 4: Inject context into request extensions.
    // Route handlers can extract this using Extension<AuthContext>
    let auth_context = AuthContext {
        api_key_id: record.id,
        key_name: record.name,
    };
    request.extensions_mut().insert(auth_context);

    // Step 5: Call the next middleware/handler
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(value: &'static str) -> HeaderValue {
        HeaderValue::from_static(value)
    }

    #[test]
    fn missing_header_is_missing_key() {
        assert!(matches!(parse_bearer(None), Err(AppError::MissingApiKey)));
    }

    #[test]
    fn wrong_scheme_is_malformed() {
        assert!(matches!(
            parse_bearer(Some(&header("Basic dXNlcjpwYXNz"))),
            Err(AppError::MalformedApiKey)
        ));
        assert!(matches!(
            parse_bearer(Some(&header("token-without-scheme"))),
            Err(AppError::MalformedApiKey)
        ));
    }

    #[test]
    fn empty_or_blank_token_is_malformed() {
        assert!(matches!(
            parse_bearer(Some(&header("Bearer "))),
            Err(AppError::MalformedApiKey)
        ));
        assert!(matches!(
            parse_bearer(Some(&header("Bearer    "))),
            Err(AppError::MalformedApiKey)
        ));
    }

    #[test]
    fn non_utf8_header_is_malformed_not_missing() {
        // The header exists, it just cannot be decoded as a string
        let value = HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap();
        assert!(matches!(
            parse_bearer(Some(&value)),
            Err(AppError::MalformedApiKey)
        ));
    }

    #[test]
    fn well_formed_token_is_returned() {
        assert_eq!(
            parse_bearer(Some(&header("Bearer abc123"))).unwrap(),
            "abc123"
        );
    }
}
