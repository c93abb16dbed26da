use serde::{Deserialize, Serialize};

use crate::domains::billing::catalog::{format_price, Product};
use crate::domains::billing::models::subscription::{is_active_status, subscription_badge};
use crate::domains::billing::models::{StripeOrder, StripeSubscription};
use crate::domains::tasks::models::BadgeVariant;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCheckoutInput {
    pub price_id: String,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutData {
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductData {
    #[serde(flatten)]
    pub product: Product,
    pub formatted_price: String,
}

impl From<&Product> for ProductData {
    fn from(product: &Product) -> Self {
        Self {
            product: *product,
            formatted_price: format_price(product.price, product.currency),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStatusData {
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub status: String,
    pub badge_variant: BadgeVariant,
    pub is_active: bool,
    pub price_id: Option<String>,
    pub current_plan: Option<ProductData>,
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
    pub cancel_at_period_end: bool,
    pub payment_method_brand: Option<String>,
    pub payment_method_last4: Option<String>,
}

impl SubscriptionStatusData {
    /// Status for a user that never started checkout
    pub fn not_started() -> Self {
        Self::from_parts(None, None)
    }

    pub fn from_parts(customer_id: Option<String>, row: Option<StripeSubscription>) -> Self {
        let status = row
            .as_ref()
            .map(|r| r.status.clone())
            .unwrap_or_else(|| "not_started".to_string());
        let current_plan = row
            .as_ref()
            .and_then(|r| r.price_id.as_deref())
            .and_then(crate::domains::billing::catalog::product_by_price_id)
            .map(ProductData::from);

        Self {
            customer_id,
            subscription_id: row.as_ref().and_then(|r| r.subscription_id.clone()),
            badge_variant: subscription_badge(&status),
            is_active: is_active_status(&status),
            price_id: row.as_ref().and_then(|r| r.price_id.clone()),
            current_plan,
            current_period_start: row.as_ref().and_then(|r| r.current_period_start),
            current_period_end: row.as_ref().and_then(|r| r.current_period_end),
            cancel_at_period_end: row.as_ref().map(|r| r.cancel_at_period_end).unwrap_or(false),
            payment_method_brand: row.as_ref().and_then(|r| r.payment_method_brand.clone()),
            payment_method_last4: row.as_ref().and_then(|r| r.payment_method_last4.clone()),
            status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderData {
    pub order_id: i64,
    pub checkout_session_id: String,
    pub payment_intent_id: Option<String>,
    pub customer_id: String,
    pub amount_subtotal: i64,
    pub amount_total: i64,
    pub formatted_total: String,
    pub currency: String,
    pub payment_status: String,
    pub order_status: String,
    pub order_date: String,
}

impl From<StripeOrder> for OrderData {
    fn from(order: StripeOrder) -> Self {
        Self {
            order_id: order.id,
            formatted_total: format_price(order.amount_total, &order.currency),
            checkout_session_id: order.checkout_session_id,
            payment_intent_id: order.payment_intent_id,
            customer_id: order.customer_id,
            amount_subtotal: order.amount_subtotal,
            amount_total: order.amount_total,
            currency: order.currency,
            payment_status: order.payment_status,
            order_status: order.status,
            order_date: order.created_at.to_rfc3339(),
        }
    }
}

/// What a confirmed checkout changed
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmCheckoutData {
    pub session_id: String,
    pub mode: String,
    pub payment_status: String,
    pub order: Option<OrderData>,
    pub subscription: SubscriptionStatusData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_started_status() {
        let status = SubscriptionStatusData::not_started();
        assert_eq!(status.status, "not_started");
        assert!(!status.is_active);
        assert_eq!(status.badge_variant, BadgeVariant::Default);
        assert!(status.current_plan.is_none());
    }

    #[test]
    fn test_product_data_formats_price() {
        let data = ProductData::from(&crate::domains::billing::PRODUCTS[0]);
        assert_eq!(data.formatted_price, "$2,868");
    }
}
