use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::common::AppResult;
use crate::domains::billing::activities;
use crate::domains::billing::data::{
    CheckoutData, ConfirmCheckoutData, CreateCheckoutInput, OrderData, ProductData,
    SubscriptionStatusData,
};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/billing/products", get(list_products))
        .route("/billing/subscription", get(subscription_status))
        .route("/billing/orders", get(list_orders))
        .route("/billing/checkout", post(create_checkout))
        .route(
            "/billing/checkout/:session_id/confirm",
            post(confirm_checkout),
        )
        .with_state(deps)
}

async fn list_products() -> Json<Vec<ProductData>> {
    Json(activities::list_products())
}

async fn subscription_status(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<SubscriptionStatusData>> {
    Ok(Json(activities::subscription_status(&user, &deps).await?))
}

async fn list_orders(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<Vec<OrderData>>> {
    Ok(Json(activities::list_orders(&user, &deps).await?))
}

async fn create_checkout(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Json(input): Json<CreateCheckoutInput>,
) -> AppResult<Json<CheckoutData>> {
    Ok(Json(activities::create_checkout(&user, input, &deps).await?))
}

async fn confirm_checkout(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(session_id): Path<String>,
) -> AppResult<Json<ConfirmCheckoutData>> {
    Ok(Json(
        activities::confirm_checkout(&user, &session_id, &deps).await?,
    ))
}
