//! Service configuration.
//!
//! Everything the server needs at startup comes from two environment
//! variables, deserialized into [`Config`] with `envy`. A `.env` file in the
//! working directory is honored when present, which keeps local runs and
//! containers on the same code path.

use serde::Deserialize;

/// Runtime configuration for the user API service.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP listen port, defaults to 3000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,
}

/// Listen port when SERVER_PORT is unset.
fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Loads `.env` first if one exists (missing is fine), then maps
    /// environment variables onto the struct fields by name
    /// (`database_url` reads `DATABASE_URL`, and so on).
    ///
    /// # Errors
    ///
    /// Fails if `DATABASE_URL` is absent or a value cannot be parsed into
    /// its field type.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }
}
