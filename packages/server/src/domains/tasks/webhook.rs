//! Task completion webhook.
//!
//! External systems call `POST /task-webhook/{task_id}` to mark a task done.
//! The endpoint is public: no authentication, signature or idempotency key.
//! Only tasks whose metadata opts in (`webhook_url` or `webhook_enabled`)
//! can be completed this way.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::common::TaskId;
use crate::domains::clients::Client;
use crate::domains::notifications::activities::notify_task_completed;
use crate::domains::tasks::models::Task;
use crate::kernel::ServerDeps;

/// Build the axum router for the webhook endpoint.
///
/// Mounted outside the app-wide CORS layer; it answers CORS itself.
pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/task-webhook", any(missing_task_id))
        .route("/task-webhook/", any(missing_task_id))
        .route(
            "/task-webhook/:task_id",
            post(handle_task_webhook)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(deps)
}

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

fn json_response(status: StatusCode, body: Value) -> Response {
    with_cors((status, Json(body)).into_response())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    json_response(status, json!({ "error": message }))
}

async fn preflight() -> Response {
    with_cors(StatusCode::OK.into_response())
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

async fn missing_task_id(method: Method) -> Response {
    match method {
        Method::OPTIONS => preflight().await,
        Method::POST => error_response(StatusCode::BAD_REQUEST, "Task ID is required"),
        _ => method_not_allowed().await,
    }
}

/// Non-empty bodies are parsed as JSON; empty or invalid bodies count as `{}`.
pub fn parse_payload(body: &[u8]) -> Value {
    if body.is_empty() {
        return json!({});
    }
    serde_json::from_slice(body).unwrap_or_else(|_| {
        tracing::debug!("No JSON body or invalid JSON, proceeding with empty data");
        json!({})
    })
}

/// A task opts in with a non-empty `webhook_url` or `webhook_enabled: true`.
pub fn webhook_enabled(metadata: &Value) -> bool {
    let has_url = metadata
        .get("webhook_url")
        .and_then(Value::as_str)
        .map(|url| !url.trim().is_empty())
        .unwrap_or(false);
    let flagged = metadata
        .get("webhook_enabled")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    has_url || flagged
}

async fn handle_task_webhook(
    State(deps): State<Arc<ServerDeps>>,
    Path(raw_task_id): Path<String>,
    body: Bytes,
) -> Response {
    let pool = &deps.db_pool;
    let payload = parse_payload(&body);

    let task = match TaskId::parse(&raw_task_id) {
        Ok(task_id) => Task::find_optional(task_id, pool).await,
        Err(_) => Ok(None),
    };
    let task = match task {
        Ok(Some(task)) => task,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Task not found"),
        Err(e) => {
            tracing::error!(task_id = %raw_task_id, error = %e, "Webhook task lookup failed");
            return error_response(StatusCode::NOT_FOUND, "Task not found");
        }
    };

    if !webhook_enabled(&task.metadata.0) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Task does not have webhook functionality enabled",
        );
    }

    let completed_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let patch = json!({
        "webhook_completed_at": completed_at,
        "webhook_data": payload,
    });

    let updated = match Task::complete_with_metadata(task.id, patch, pool).await {
        Ok(updated) => updated,
        Err(e) => {
            tracing::error!(task_id = %task.id, error = %e, "Error updating task from webhook");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update task status",
            );
        }
    };

    tracing::info!(task_id = %updated.id, "Task marked as completed via webhook");
    notify_assignee(&updated, pool).await;

    json_response(
        StatusCode::OK,
        json!({
            "success": true,
            "message": "Task marked as completed",
            "taskId": updated.id.to_string(),
            "completedAt": completed_at,
        }),
    )
}

/// Tell the client's assigned agency user; failures only get logged.
async fn notify_assignee(task: &Task, pool: &PgPool) {
    match Client::find_by_id(task.client_id, pool).await {
        Ok(client) => {
            if let Some(assignee) = client.assigned_user_id {
                notify_task_completed(assignee, task.id, &task.title, &client.full_name, pool)
                    .await;
            }
        }
        Err(e) => {
            tracing::warn!(task_id = %task.id, error = %e, "Could not load client for webhook notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload(b""), json!({}));
        assert_eq!(parse_payload(b"not json"), json!({}));
        assert_eq!(parse_payload(br#"{"source":"zapier"}"#), json!({"source": "zapier"}));
    }

    #[test]
    fn test_webhook_enabled() {
        assert!(webhook_enabled(&json!({"webhook_url": "https://hooks.example/x"})));
        assert!(webhook_enabled(&json!({"webhook_enabled": true})));
        assert!(!webhook_enabled(&json!({"webhook_url": ""})));
        assert!(!webhook_enabled(&json!({"webhook_url": "   "})));
        assert!(!webhook_enabled(&json!({"webhook_url": 1})));
        assert!(!webhook_enabled(&json!({"webhook_enabled": false})));
        assert!(!webhook_enabled(&json!({})));
    }
}
