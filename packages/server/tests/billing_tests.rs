//! Product catalog, hosted checkout and the billing mirror.

mod common;

use std::sync::Arc;

use crate::common::{sign_up_agency, TestHarness};
use plankport_core::kernel::{
    CheckoutSessionDetails, MockPaymentGateway, ServerDeps, SubscriptionDetails, TestDependencies,
};
use serde_json::json;
use test_context::test_context;

const MONTHLY_PRICE: &str = "price_1RrOaKJqCJQV0KJvKrfVmjkZ";

#[test_context(TestHarness)]
#[tokio::test]
async fn products_are_public(ctx: &TestHarness) {
    let products = ctx.api().get("/billing/products").await;

    assert_eq!(products.status, 200);
    assert_eq!(products.body.as_array().unwrap().len(), 4);
    assert_eq!(products.body[0]["formatted_price"], "$2,868");
    assert_eq!(products.body[0]["mode"], "subscription");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn checkout_creates_customer_once(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "checkout").await;
    let owner = api.authed(&agency.token);

    let before = owner.get("/billing/subscription").await;
    assert_eq!(before.status, 200);
    assert_eq!(before.body["status"], "not_started");
    assert_eq!(before.body["is_active"], false);

    let first = owner
        .post("/billing/checkout", json!({ "price_id": MONTHLY_PRICE }))
        .await;
    assert_eq!(first.status, 200, "{}", first.body);
    assert!(first.body["url"].as_str().unwrap().starts_with("https://checkout.test/"));

    owner
        .post("/billing/checkout", json!({ "price_id": MONTHLY_PRICE }))
        .await;

    let gateway = &ctx.mocks.payment_gateway;
    assert_eq!(gateway.customers().len(), 1);
    let calls = gateway.checkout_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].customer_id, calls[1].customer_id);
    assert_eq!(calls[0].mode, "subscription");
    assert_eq!(
        calls[0].success_url,
        "http://app.test/success?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(calls[0].cancel_url, "http://app.test/pricing");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn checkout_validates_price_and_mode(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "bad-checkout").await;
    let owner = api.authed(&agency.token);

    let unknown = owner
        .post("/billing/checkout", json!({ "price_id": "price_nope" }))
        .await;
    assert_eq!(unknown.status, 400);

    let bad_mode = owner
        .post(
            "/billing/checkout",
            json!({ "price_id": MONTHLY_PRICE, "mode": "setup" }),
        )
        .await;
    assert_eq!(bad_mode.status, 400);
    assert!(ctx.mocks.payment_gateway.checkout_calls().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn confirming_subscription_checkout_mirrors_status(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "confirm").await;
    let owner = api.authed(&agency.token);

    let checkout = owner
        .post("/billing/checkout", json!({ "price_id": MONTHLY_PRICE }))
        .await;
    let session_id = checkout.body["session_id"].as_str().unwrap().to_string();
    let customer_id = ctx.mocks.payment_gateway.checkout_calls()[0]
        .customer_id
        .clone();

    ctx.mocks.payment_gateway.add_session(CheckoutSessionDetails {
        id: session_id.clone(),
        customer_id: customer_id.clone(),
        mode: "subscription".to_string(),
        status: Some("complete".to_string()),
        payment_status: "paid".to_string(),
        payment_intent_id: None,
        amount_subtotal: 29900,
        amount_total: 29900,
        currency: "cad".to_string(),
        subscription: Some(SubscriptionDetails {
            id: format!("sub_{}", uuid::Uuid::new_v4().simple()),
            status: "active".to_string(),
            price_id: Some(MONTHLY_PRICE.to_string()),
            current_period_start: Some(1_754_000_000),
            current_period_end: Some(1_756_600_000),
            cancel_at_period_end: false,
            payment_method_brand: Some("visa".to_string()),
            payment_method_last4: Some("4242".to_string()),
        }),
    });

    let confirmed = owner
        .post(&format!("/billing/checkout/{}/confirm", session_id), json!({}))
        .await;
    assert_eq!(confirmed.status, 200, "{}", confirmed.body);
    assert!(confirmed.body["order"].is_null());
    assert_eq!(confirmed.body["subscription"]["status"], "active");

    let status = owner.get("/billing/subscription").await;
    assert_eq!(status.body["is_active"], true);
    assert_eq!(status.body["badge_variant"], "success");
    assert_eq!(status.body["customer_id"], customer_id.as_str());
    assert_eq!(
        status.body["current_plan"]["name"],
        "PlankPort - Agency Plan (Monthly)"
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn confirming_paid_payment_records_order(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "orders").await;
    let owner = api.authed(&agency.token);

    owner
        .post(
            "/billing/checkout",
            json!({ "price_id": MONTHLY_PRICE, "mode": "payment" }),
        )
        .await;
    let call = ctx.mocks.payment_gateway.checkout_calls()[0].clone();
    assert_eq!(call.mode, "payment");

    let session_id = format!("cs_paid_{}", uuid::Uuid::new_v4().simple());
    ctx.mocks.payment_gateway.add_session(CheckoutSessionDetails {
        id: session_id.clone(),
        customer_id: call.customer_id.clone(),
        mode: "payment".to_string(),
        status: Some("complete".to_string()),
        payment_status: "paid".to_string(),
        payment_intent_id: Some("pi_test".to_string()),
        amount_subtotal: 29900,
        amount_total: 29900,
        currency: "cad".to_string(),
        subscription: None,
    });

    let path = format!("/billing/checkout/{}/confirm", session_id);
    let confirmed = owner.post(&path, json!({})).await;
    assert_eq!(confirmed.status, 200, "{}", confirmed.body);
    assert_eq!(confirmed.body["order"]["formatted_total"], "$299");

    // Confirming twice keeps one order
    owner.post(&path, json!({})).await;
    let orders = owner.get("/billing/orders").await;
    assert_eq!(orders.body.as_array().unwrap().len(), 1);
    assert_eq!(orders.body[0]["checkout_session_id"], session_id.as_str());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn confirming_another_customers_session_is_forbidden(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "foreign-session").await;
    let owner = api.authed(&agency.token);
    owner
        .post("/billing/checkout", json!({ "price_id": MONTHLY_PRICE }))
        .await;

    let session_id = format!("cs_foreign_{}", uuid::Uuid::new_v4().simple());
    ctx.mocks.payment_gateway.add_session(CheckoutSessionDetails {
        id: session_id.clone(),
        customer_id: "cus_someone_else".to_string(),
        mode: "payment".to_string(),
        status: Some("complete".to_string()),
        payment_status: "paid".to_string(),
        payment_intent_id: None,
        amount_subtotal: 100,
        amount_total: 100,
        currency: "cad".to_string(),
        subscription: None,
    });

    let response = owner
        .post(&format!("/billing/checkout/{}/confirm", session_id), json!({}))
        .await;
    assert_eq!(response.status, 403);
    assert_eq!(owner.get("/billing/orders").await.body, json!([]));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn checkout_without_payments_configured(ctx: &TestHarness) {
    let mocks = TestDependencies::new();
    let deps = ServerDeps::new(
        ctx.db_pool.clone(),
        ctx.jwt_service.clone(),
        mocks.object_store.clone(),
        None,
        mocks.magic_links.clone(),
        "http://app.test".to_string(),
        mocks.profile_timeout,
    );
    let api = ctx.api_with(Arc::new(deps));
    let agency = sign_up_agency(&api, "no-payments").await;

    let response = api
        .authed(&agency.token)
        .post("/billing/checkout", json!({ "price_id": MONTHLY_PRICE }))
        .await;
    assert_eq!(response.status, 503);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn fresh_gateway_per_harness(ctx: &TestHarness) {
    let gateway = MockPaymentGateway::new();
    let mocks = TestDependencies::new().mock_payments(gateway);
    let api = ctx.api_with(Arc::new(
        mocks
            .clone()
            .into_server_deps(ctx.db_pool.clone(), ctx.jwt_service.clone()),
    ));
    let agency = sign_up_agency(&api, "fresh").await;

    api.authed(&agency.token)
        .post("/billing/checkout", json!({ "price_id": MONTHLY_PRICE }))
        .await;

    assert_eq!(mocks.payment_gateway.checkout_calls().len(), 1);
    assert!(ctx.mocks.payment_gateway.checkout_calls().is_empty());
}
