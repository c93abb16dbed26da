// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business rules (who may upload, which prices exist) live in the domains.
//
// Naming convention: Base* for trait names (e.g., BaseObjectStore)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// =============================================================================
// Object Storage Trait (Infrastructure - buckets of files)
// =============================================================================

/// Location of a stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub bucket: String,
    pub path: String,
    pub url: String,
}

#[async_trait]
pub trait BaseObjectStore: Send + Sync {
    /// Write an object, replacing any existing one at the same path
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject>;

    /// Remove an object; removing a missing object is not an error
    async fn delete(&self, bucket: &str, path: &str) -> Result<()>;

    /// Public URL for an object
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

// =============================================================================
// Payment Gateway Trait (Infrastructure - hosted checkout)
// =============================================================================

/// Input for a hosted checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub price_id: String,
    pub mode: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// A freshly created checkout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Subscription attached to a completed checkout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDetails {
    pub id: String,
    pub status: String,
    pub price_id: Option<String>,
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
    pub cancel_at_period_end: bool,
    pub payment_method_brand: Option<String>,
    pub payment_method_last4: Option<String>,
}

/// Checkout session as reported back by the processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionDetails {
    pub id: String,
    pub customer_id: String,
    pub mode: String,
    pub status: Option<String>,
    pub payment_status: String,
    pub payment_intent_id: Option<String>,
    pub amount_subtotal: i64,
    pub amount_total: i64,
    pub currency: String,
    pub subscription: Option<SubscriptionDetails>,
}

#[async_trait]
pub trait BasePaymentGateway: Send + Sync {
    /// Create a customer and return its processor id
    async fn create_customer(&self, email: &str, user_id: &str) -> Result<String>;

    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSession>;

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSessionDetails>;
}

// =============================================================================
// Magic Link Delivery Trait (Infrastructure - email)
// =============================================================================

#[async_trait]
pub trait BaseMagicLinkSender: Send + Sync {
    async fn send_magic_link(&self, email: &str, link: &str) -> Result<()>;
}
