//! User API Service - Main Application Entry Point
//!
//! This is a REST API server for managing user records, protected by API key
//! authentication. API keys are themselves managed through the API, with the
//! raw secret shown exactly once at creation.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: Bearer API key, SHA-256 hashed, linear scan over active keys
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod security;
mod services;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Create authenticated routes (API endpoints)
    let authenticated_routes = Router::new()
        // API key management routes (creation is public, see below)
        .route("/api/v1/api-keys", get(handlers::api_keys::list_api_keys))
        .route(
            "/api/v1/api-keys/{id}",
            get(handlers::api_keys::get_api_key),
        )
        .route(
            "/api/v1/api-keys/{id}",
            put(handlers::api_keys::update_api_key),
        )
        .route(
            "/api/v1/api-keys/{id}",
            delete(handlers::api_keys::delete_api_key),
        )
        // User management routes
        .route("/api/v1/users", post(handlers::users::create_user))
        .route("/api/v1/users", get(handlers::users::list_users))
        .route("/api/v1/users/{id}", get(handlers::users::get_user))
        .route("/api/v1/users/{id}", put(handlers::users::update_user))
        .route("/api/v1/users/{id}", delete(handlers::users::delete_user))
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            pool.clone(),
            middleware::auth::auth_middleware,
        ));

    // Combine authenticated routes with public routes
    let app = Router::new()
        // Public routes (no authentication required)
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        // Key creation is the bootstrap path: deliberately unauthenticated,
        // since the first key cannot be created with a key
        .route(
            "/api/v1/api-keys",
            post(handlers::api_keys::create_api_key),
        )
        // Merge authenticated routes
        .merge(authenticated_routes)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share database pool with all handlers via State extraction
        .with_state(pool);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
