use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{
    BasePaymentGateway, CheckoutRequest, CheckoutSession, CheckoutSessionDetails,
    SubscriptionDetails,
};

/// Stripe REST client (form-encoded requests, JSON responses)
pub struct StripeGateway {
    secret_key: String,
    api_base: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StripeCustomer {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripeCheckoutSession {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    customer: Option<String>,
    mode: String,
    #[serde(default)]
    status: Option<String>,
    payment_status: String,
    #[serde(default)]
    payment_intent: Option<String>,
    #[serde(default)]
    amount_subtotal: Option<i64>,
    #[serde(default)]
    amount_total: Option<i64>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    subscription: Option<StripeSubscription>,
}

#[derive(Debug, Deserialize)]
struct StripeSubscription {
    id: String,
    status: String,
    #[serde(default)]
    current_period_start: Option<i64>,
    #[serde(default)]
    current_period_end: Option<i64>,
    #[serde(default)]
    cancel_at_period_end: bool,
    items: StripeList<StripeSubscriptionItem>,
    #[serde(default)]
    default_payment_method: Option<StripePaymentMethod>,
}

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StripeSubscriptionItem {
    price: StripePrice,
    #[serde(default)]
    current_period_start: Option<i64>,
    #[serde(default)]
    current_period_end: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripePrice {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripePaymentMethod {
    #[serde(default)]
    card: Option<StripeCard>,
}

#[derive(Debug, Deserialize)]
struct StripeCard {
    brand: String,
    last4: String,
}

impl StripeGateway {
    pub fn new(secret_key: String, api_base: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            secret_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Stripe API error {}: {}", status, body);
        }
        response
            .json()
            .await
            .context("Failed to parse Stripe response")
    }
}

impl From<StripeSubscription> for SubscriptionDetails {
    fn from(sub: StripeSubscription) -> Self {
        let first_item = sub.items.data.into_iter().next();
        let card = sub.default_payment_method.and_then(|pm| pm.card);
        Self {
            id: sub.id,
            status: sub.status,
            price_id: first_item.as_ref().map(|item| item.price.id.clone()),
            // Newer API versions report the period on the item
            current_period_start: sub
                .current_period_start
                .or_else(|| first_item.as_ref().and_then(|i| i.current_period_start)),
            current_period_end: sub
                .current_period_end
                .or_else(|| first_item.as_ref().and_then(|i| i.current_period_end)),
            cancel_at_period_end: sub.cancel_at_period_end,
            payment_method_brand: card.as_ref().map(|c| c.brand.clone()),
            payment_method_last4: card.map(|c| c.last4),
        }
    }
}

#[async_trait]
impl BasePaymentGateway for StripeGateway {
    async fn create_customer(&self, email: &str, user_id: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/customers", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&[("email", email), ("metadata[userId]", user_id)])
            .send()
            .await
            .context("Failed to send Stripe customer request")?;

        let customer: StripeCustomer = Self::parse(response).await?;
        tracing::info!(customer_id = %customer.id, user_id, "Created Stripe customer");
        Ok(customer.id)
    }

    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        let form = [
            ("customer", request.customer_id.as_str()),
            ("payment_method_types[0]", "card"),
            ("line_items[0][price]", request.price_id.as_str()),
            ("line_items[0][quantity]", "1"),
            ("mode", request.mode.as_str()),
            ("success_url", request.success_url.as_str()),
            ("cancel_url", request.cancel_url.as_str()),
        ];

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .context("Failed to send Stripe checkout request")?;

        let session: StripeCheckoutSession = Self::parse(response).await?;
        let url = session
            .url
            .context("Stripe checkout session has no redirect URL")?;

        Ok(CheckoutSession { id: session.id, url })
    }

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSessionDetails> {
        let response = self
            .client
            .get(format!("{}/v1/checkout/sessions/{}", self.api_base, session_id))
            .bearer_auth(&self.secret_key)
            .query(&[
                ("expand[]", "subscription"),
                ("expand[]", "subscription.default_payment_method"),
            ])
            .send()
            .await
            .context("Failed to send Stripe session request")?;

        let session: StripeCheckoutSession = Self::parse(response).await?;
        let customer_id = session
            .customer
            .context("Stripe checkout session has no customer")?;

        Ok(CheckoutSessionDetails {
            id: session.id,
            customer_id,
            mode: session.mode,
            status: session.status,
            payment_status: session.payment_status,
            payment_intent_id: session.payment_intent,
            amount_subtotal: session.amount_subtotal.unwrap_or(0),
            amount_total: session.amount_total.unwrap_or(0),
            currency: session.currency.unwrap_or_else(|| "cad".to_string()),
            subscription: session.subscription.map(Into::into),
        })
    }
}
