//! Passwordless sign-in.
//!
//! A link carries a random 32-byte token (hex). Only its SHA-256 is stored;
//! the link is valid for 15 minutes and can be used once.

use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::common::text::normalize_email;
use crate::common::{AppResult, AuthError};
use crate::domains::auth::activities::session::issue_session;
use crate::domains::auth::models::MagicLink;
use crate::domains::auth::AuthSession;
use crate::domains::users::User;
use crate::kernel::ServerDeps;

pub const MAGIC_LINK_TTL_MINUTES: i64 = 15;

pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub fn magic_link_url(app_base_url: &str, token: &str) -> String {
    format!("{}/login?token={}", app_base_url, token)
}

/// Create a link for a known user and hand it to the sender
pub async fn issue_magic_link(user: &User, deps: &ServerDeps) -> AppResult<()> {
    let token = generate_token();
    let expires_at = Utc::now() + Duration::minutes(MAGIC_LINK_TTL_MINUTES);
    MagicLink::create(user.id, &hash_token(&token), expires_at, &deps.db_pool).await?;

    deps.magic_link_sender
        .send_magic_link(&user.email, &magic_link_url(&deps.app_base_url, &token))
        .await?;

    tracing::info!(user_id = %user.id, "Magic link sent");
    Ok(())
}

/// Unknown emails succeed silently so accounts cannot be enumerated.
pub async fn request_magic_link(email: &str, deps: &ServerDeps) -> AppResult<()> {
    let email = normalize_email(email);
    match User::find_by_email(&email, &deps.db_pool).await? {
        Some(user) => issue_magic_link(&user, deps).await,
        None => {
            tracing::debug!("Magic link requested for unknown email");
            Ok(())
        }
    }
}

pub async fn verify_magic_link(token: &str, deps: &ServerDeps) -> AppResult<AuthSession> {
    let link = MagicLink::consume(&hash_token(token.trim()), &deps.db_pool)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    let user = User::find_optional(link.user_id, &deps.db_pool)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    tracing::info!(user_id = %user.id, "Signed in with magic link");
    issue_session(user, deps).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_random_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_stable_and_not_the_token() {
        let token = "abc123";
        assert_eq!(hash_token(token), hash_token(token));
        assert_ne!(hash_token(token), token);
        assert_eq!(hash_token(token).len(), 64);
    }

    #[test]
    fn test_link_url() {
        assert_eq!(
            magic_link_url("http://app.test", "tok"),
            "http://app.test/login?token=tok"
        );
    }
}
