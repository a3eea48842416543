//! Store operations, separated from HTTP handlers.
//!
//! Each service module owns the persistence logic for one resource:
//! queries, uniqueness rules, and the translation of storage outcomes into
//! domain errors. Handlers stay thin and call into these.

pub mod api_key_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::{self, DbPool};

    /// Connect to the database named by `DATABASE_URL` and apply migrations.
    ///
    /// The storage tests that use this are `#[ignore]`d by default so the
    /// suite passes without infrastructure; run them against a scratch
    /// database with `cargo test -- --ignored`.
    pub async fn test_pool() -> DbPool {
        let url = std::env::var("DATABASE_URL").expect("storage tests require DATABASE_URL");
        let pool = db::create_pool(&url).await.expect("connect to database");
        db::run_migrations(&pool).await.expect("apply migrations");
        pool
    }
}
