use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{MagicLinkId, UserId};

/// A single-use sign-in link; only the SHA-256 of the token is stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MagicLink {
    pub id: MagicLinkId,
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MagicLink {
    pub async fn create(
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO magic_links (id, user_id, token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(MagicLinkId::new())
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Mark the link consumed. Returns None if it is unknown, expired or already used.
    pub async fn consume(token_hash: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE magic_links
            SET consumed_at = NOW()
            WHERE token_hash = $1
              AND consumed_at IS NULL
              AND expires_at > NOW()
            RETURNING *
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Drop links that can no longer be used
    pub async fn delete_stale(pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM magic_links WHERE consumed_at IS NOT NULL OR expires_at < NOW() - INTERVAL '1 day'",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
