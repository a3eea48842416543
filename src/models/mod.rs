//! Data models representing stored entities.
//!
//! This module contains the structs that map to database rows, together with
//! the request/response types for each resource and their field validation.

/// API key record and request/response types
pub mod api_key;
/// User record and request/response types
pub mod user;
