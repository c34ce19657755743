use std::env;

use review_core::{ConfigError, Credentials};

/// Load credentials from `.env` (when present) and the process environment.
pub fn credentials_from_env() -> Result<Credentials, ConfigError> {
    dotenvy::dotenv().ok();
    Credentials::from_lookup(|name| env::var(name).ok())
}
