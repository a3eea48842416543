//! PostgreSQL pool construction and schema migrations.
//!
//! The pool is created once in `main` and handed to the router as shared
//! state, so every handler and the auth middleware receive the same
//! explicitly injected connection handle rather than reaching for
//! module-level globals. It is read-only after startup and dropped at
//! shutdown.

use sqlx::{Pool, Postgres};

/// Shorthand for the PostgreSQL connection pool threaded through the app.
pub type DbPool = Pool<Postgres>;

/// Open a connection pool against `database_url`.
///
/// Capped at 5 connections; the user and key tables this service works
/// with are small and request handlers hold a connection only for the
/// duration of a single query. Connections are opened lazily and idle ones
/// are reused.
///
/// # Errors
///
/// Fails if the URL does not parse or PostgreSQL cannot be reached or
/// refuses the credentials.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Apply pending migrations from `migrations/`.
///
/// Runs every `<timestamp>_<name>.sql` file that has not been applied yet;
/// sqlx records applied migrations in its `_sqlx_migrations` table so this
/// is safe to call on every startup. The migration set is embedded at
/// compile time by the `migrate!` macro.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
