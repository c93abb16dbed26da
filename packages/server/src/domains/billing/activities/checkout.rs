//! Hosted checkout and the mirror rows it maintains.
//!
//! Billing belongs to the agency owner: every operation except the product
//! list requires `ManageBilling`.

use std::sync::Arc;

use crate::common::{Actor, AppError, AppResult, Capability};
use crate::domains::billing::catalog::{product_by_price_id, PRODUCTS};
use crate::domains::billing::data::{
    CheckoutData, ConfirmCheckoutData, CreateCheckoutInput, OrderData, ProductData,
    SubscriptionStatusData,
};
use crate::domains::billing::models::{
    StripeCustomer, StripeOrder, StripeSubscription, UpsertOrder, UpsertSubscription,
};
use crate::kernel::{BasePaymentGateway, CheckoutRequest, ServerDeps};
use crate::server::middleware::AuthUser;

const CHECKOUT_MODES: [&str; 2] = ["payment", "subscription"];

fn require_billing(user: &AuthUser) -> AppResult<()> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageBilling)
        .check()?;
    Ok(())
}

fn gateway(deps: &ServerDeps) -> AppResult<Arc<dyn BasePaymentGateway>> {
    deps.payment_gateway
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable("Payments are not configured".to_string()))
}

pub fn list_products() -> Vec<ProductData> {
    PRODUCTS.iter().map(ProductData::from).collect()
}

async fn ensure_customer(
    user: &AuthUser,
    gateway: &dyn BasePaymentGateway,
    deps: &ServerDeps,
) -> AppResult<StripeCustomer> {
    if let Some(existing) = StripeCustomer::find_by_user(user.user_id, &deps.db_pool).await? {
        return Ok(existing);
    }

    let customer_id = gateway
        .create_customer(&user.email, &user.user_id.to_string())
        .await?;
    let customer = StripeCustomer::create(user.user_id, &customer_id, &deps.db_pool).await?;
    tracing::info!(user_id = %user.user_id, customer_id = %customer_id, "Payment customer created");
    Ok(customer)
}

pub async fn create_checkout(
    user: &AuthUser,
    input: CreateCheckoutInput,
    deps: &ServerDeps,
) -> AppResult<CheckoutData> {
    require_billing(user)?;

    let product = product_by_price_id(&input.price_id)
        .ok_or_else(|| AppError::bad_request("Unknown price_id"))?;
    let mode = input.mode.unwrap_or_else(|| product.mode.to_string());
    if !CHECKOUT_MODES.contains(&mode.as_str()) {
        return Err(AppError::bad_request(
            "mode must be either payment or subscription",
        ));
    }

    let gateway = gateway(deps)?;
    let customer = ensure_customer(user, gateway.as_ref(), deps).await?;

    let session = gateway
        .create_checkout_session(CheckoutRequest {
            customer_id: customer.customer_id.clone(),
            price_id: product.price_id.to_string(),
            mode,
            success_url: format!(
                "{}/success?session_id={{CHECKOUT_SESSION_ID}}",
                deps.app_base_url
            ),
            cancel_url: format!("{}/pricing", deps.app_base_url),
        })
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        session_id = %session.id,
        price_id = product.price_id,
        "Checkout session created"
    );
    Ok(CheckoutData {
        session_id: session.id,
        url: session.url,
    })
}

/// Pull a finished session from the processor and mirror its outcome
pub async fn confirm_checkout(
    user: &AuthUser,
    session_id: &str,
    deps: &ServerDeps,
) -> AppResult<ConfirmCheckoutData> {
    require_billing(user)?;
    let gateway = gateway(deps)?;

    let customer = StripeCustomer::find_by_user(user.user_id, &deps.db_pool)
        .await?
        .ok_or_else(|| AppError::Forbidden("No checkout started for this account".to_string()))?;

    let session = gateway.retrieve_checkout_session(session_id).await?;
    if session.customer_id != customer.customer_id {
        tracing::warn!(user_id = %user.user_id, session_id, "Checkout session belongs to another customer");
        return Err(AppError::Forbidden(
            "Checkout session belongs to another customer".to_string(),
        ));
    }

    let mut order = None;
    if session.mode == "payment" && session.payment_status == "paid" {
        let row = StripeOrder::upsert(
            UpsertOrder::builder()
                .checkout_session_id(session.id.clone())
                .customer_id(customer.customer_id.clone())
                .amount_subtotal(session.amount_subtotal)
                .amount_total(session.amount_total)
                .currency(session.currency.clone())
                .payment_status(session.payment_status.clone())
                .payment_intent_id(session.payment_intent_id.clone())
                .build(),
            &deps.db_pool,
        )
        .await?;
        tracing::info!(order_id = row.id, session_id = %session.id, "Order recorded");
        order = Some(OrderData::from(row));
    }

    if let Some(sub) = session.subscription.as_ref() {
        StripeSubscription::upsert(
            UpsertSubscription::builder()
                .customer_id(customer.customer_id.clone())
                .subscription_id(sub.id.clone())
                .status(sub.status.clone())
                .price_id(sub.price_id.clone())
                .current_period_start(sub.current_period_start)
                .current_period_end(sub.current_period_end)
                .cancel_at_period_end(sub.cancel_at_period_end)
                .payment_method_brand(sub.payment_method_brand.clone())
                .payment_method_last4(sub.payment_method_last4.clone())
                .build(),
            &deps.db_pool,
        )
        .await?;
        tracing::info!(subscription_id = %sub.id, status = %sub.status, "Subscription synced");
    }

    let row = StripeSubscription::find_by_customer(&customer.customer_id, &deps.db_pool).await?;
    Ok(ConfirmCheckoutData {
        session_id: session.id,
        mode: session.mode,
        payment_status: session.payment_status,
        order,
        subscription: SubscriptionStatusData::from_parts(Some(customer.customer_id), row),
    })
}

pub async fn subscription_status(
    user: &AuthUser,
    deps: &ServerDeps,
) -> AppResult<SubscriptionStatusData> {
    require_billing(user)?;
    let Some(customer) = StripeCustomer::find_by_user(user.user_id, &deps.db_pool).await? else {
        return Ok(SubscriptionStatusData::not_started());
    };
    let row = StripeSubscription::find_by_customer(&customer.customer_id, &deps.db_pool).await?;
    Ok(SubscriptionStatusData::from_parts(Some(customer.customer_id), row))
}

pub async fn list_orders(user: &AuthUser, deps: &ServerDeps) -> AppResult<Vec<OrderData>> {
    require_billing(user)?;
    let Some(customer) = StripeCustomer::find_by_user(user.user_id, &deps.db_pool).await? else {
        return Ok(Vec::new());
    };
    let orders = StripeOrder::list_for_customer(&customer.customer_id, &deps.db_pool).await?;
    Ok(orders.into_iter().map(Into::into).collect())
}
