use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::UserId;

/// Link between a user and their payment-processor customer
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StripeCustomer {
    pub user_id: UserId,
    pub customer_id: String,
    pub created_at: DateTime<Utc>,
}

impl StripeCustomer {
    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM stripe_customers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert the mapping and an empty subscription row for it
    pub async fn create(user_id: UserId, customer_id: &str, pool: &PgPool) -> Result<Self> {
        let mut tx = pool.begin().await?;
        let customer = sqlx::query_as::<_, Self>(
            "INSERT INTO stripe_customers (user_id, customer_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO stripe_subscriptions (customer_id, status) VALUES ($1, 'not_started')
             ON CONFLICT (customer_id) DO NOTHING",
        )
        .bind(customer_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(customer)
    }
}
