//! Password Hashing
//! Mission: Verify credentials without stalling the async runtime

use anyhow::{Context, Result};
use tokio::task;

/// Bcrypt hasher with a configurable cost factor.
///
/// Hashing and verification are CPU-bound, so both run on the blocking
/// thread pool rather than a runtime worker.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password
    pub async fn hash(&self, password: String) -> Result<String> {
        let cost = self.cost;
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("Hashing task panicked")?
            .context("Failed to hash password")
    }

    /// Compare a submitted password against a stored hash
    pub async fn verify(&self, password: String, hash: String) -> Result<bool> {
        task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .context("Verification task panicked")?
            .context("Failed to verify password")
    }
}
