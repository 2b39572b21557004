//! Runtime Configuration
//! Mission: Load every tunable once at startup, pass it in explicitly

use anyhow::{Context, Result};
use std::env;

/// Process configuration, read from the environment once at startup and
/// handed to the components that need it. Nothing here is global state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (`BIND_ADDR`)
    pub bind_addr: String,
    /// Path of the SQLite user database (`AUTH_DB_PATH`)
    pub database_path: String,
    /// HS256 signing secret for credential tokens (`JWT_SECRET`)
    pub jwt_secret: String,
    /// Bcrypt cost factor (`BCRYPT_COST`)
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let database_path =
            env::var("AUTH_DB_PATH").unwrap_or_else(|_| "rollcall_auth.db".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-in-production-minimum-32-characters".to_string());

        let bcrypt_cost = env::var("BCRYPT_COST")
            .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
            .parse::<u32>()
            .context("BCRYPT_COST must be a positive integer")?;

        // bcrypt only accepts costs in this range
        if !(4..=31).contains(&bcrypt_cost) {
            anyhow::bail!("BCRYPT_COST must be between 4 and 31, got {}", bcrypt_cost);
        }

        Ok(Self {
            bind_addr,
            database_path,
            jwt_secret,
            bcrypt_cost,
        })
    }
}
