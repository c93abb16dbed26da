use anyhow::{anyhow, Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password using bcrypt (off the async runtime)
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .context("Password hashing task panicked")?
        .map_err(|e| anyhow!("Failed to hash password: {}", e))
}

/// Verify a password against a stored hash
pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .context("Password verification task panicked")?
        .map_err(|e| anyhow!("Failed to verify password: {}", e))
}
