//! Request middleware.
//!
//! The only middleware this service carries is API key authentication: it
//! runs ahead of every protected handler, verifies the bearer token, and
//! either injects an [`auth::AuthContext`] or short-circuits with 401.

pub mod auth;
