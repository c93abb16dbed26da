use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

/// One-off payment completed through checkout
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StripeOrder {
    pub id: i64,
    pub checkout_session_id: String,
    pub payment_intent_id: Option<String>,
    pub customer_id: String,
    pub amount_subtotal: i64,
    pub amount_total: i64,
    pub currency: String,
    pub payment_status: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct UpsertOrder {
    pub checkout_session_id: String,
    pub customer_id: String,
    pub amount_subtotal: i64,
    pub amount_total: i64,
    pub currency: String,
    pub payment_status: String,
    #[builder(default)]
    pub payment_intent_id: Option<String>,
}

impl StripeOrder {
    /// Insert once per checkout session; a repeated confirm refreshes the row
    pub async fn upsert(input: UpsertOrder, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO stripe_orders (
                checkout_session_id, payment_intent_id, customer_id,
                amount_subtotal, amount_total, currency, payment_status, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'completed')
            ON CONFLICT (checkout_session_id) DO UPDATE SET
                payment_intent_id = EXCLUDED.payment_intent_id,
                payment_status = EXCLUDED.payment_status
            RETURNING *
            "#,
        )
        .bind(input.checkout_session_id)
        .bind(input.payment_intent_id)
        .bind(input.customer_id)
        .bind(input.amount_subtotal)
        .bind(input.amount_total)
        .bind(input.currency)
        .bind(input.payment_status)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Newest first
    pub async fn list_for_customer(customer_id: &str, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM stripe_orders WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
