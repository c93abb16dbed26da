use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use crate::domains::tasks::models::BadgeVariant;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StripeSubscription {
    pub customer_id: String,
    pub subscription_id: Option<String>,
    pub price_id: Option<String>,
    pub status: String,
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
    pub cancel_at_period_end: bool,
    pub payment_method_brand: Option<String>,
    pub payment_method_last4: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct UpsertSubscription {
    pub customer_id: String,
    pub subscription_id: String,
    pub status: String,
    #[builder(default)]
    pub price_id: Option<String>,
    #[builder(default)]
    pub current_period_start: Option<i64>,
    #[builder(default)]
    pub current_period_end: Option<i64>,
    #[builder(default)]
    pub cancel_at_period_end: bool,
    #[builder(default)]
    pub payment_method_brand: Option<String>,
    #[builder(default)]
    pub payment_method_last4: Option<String>,
}

/// `active` and `trialing` count as a paying subscription
pub fn is_active_status(status: &str) -> bool {
    matches!(status, "active" | "trialing")
}

pub fn subscription_badge(status: &str) -> BadgeVariant {
    match status {
        "active" => BadgeVariant::Success,
        "trialing" => BadgeVariant::Info,
        "past_due" => BadgeVariant::Warning,
        "canceled" | "unpaid" => BadgeVariant::Danger,
        _ => BadgeVariant::Default,
    }
}

impl StripeSubscription {
    pub async fn find_by_customer(customer_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM stripe_subscriptions WHERE customer_id = $1")
            .bind(customer_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn upsert(input: UpsertSubscription, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO stripe_subscriptions (
                customer_id, subscription_id, price_id, status,
                current_period_start, current_period_end, cancel_at_period_end,
                payment_method_brand, payment_method_last4
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (customer_id) DO UPDATE SET
                subscription_id = EXCLUDED.subscription_id,
                price_id = EXCLUDED.price_id,
                status = EXCLUDED.status,
                current_period_start = EXCLUDED.current_period_start,
                current_period_end = EXCLUDED.current_period_end,
                cancel_at_period_end = EXCLUDED.cancel_at_period_end,
                payment_method_brand = EXCLUDED.payment_method_brand,
                payment_method_last4 = EXCLUDED.payment_method_last4,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(input.customer_id)
        .bind(input.subscription_id)
        .bind(input.price_id)
        .bind(input.status)
        .bind(input.current_period_start)
        .bind(input.current_period_end)
        .bind(input.cancel_at_period_end)
        .bind(input.payment_method_brand)
        .bind(input.payment_method_last4)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_badge() {
        assert_eq!(subscription_badge("active"), BadgeVariant::Success);
        assert_eq!(subscription_badge("trialing"), BadgeVariant::Info);
        assert_eq!(subscription_badge("past_due"), BadgeVariant::Warning);
        assert_eq!(subscription_badge("canceled"), BadgeVariant::Danger);
        assert_eq!(subscription_badge("unpaid"), BadgeVariant::Danger);
        assert_eq!(subscription_badge("not_started"), BadgeVariant::Default);
    }

    #[test]
    fn test_is_active_status() {
        assert!(is_active_status("active"));
        assert!(is_active_status("trialing"));
        assert!(!is_active_status("past_due"));
        assert!(!is_active_status("not_started"));
    }
}
