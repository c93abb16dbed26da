use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::common::AppResult;
use crate::domains::communications::activities;
use crate::domains::communications::data::{
    CommunicationData, ConversationData, SendMessageInput,
};
use crate::domains::tasks::edges::parse_task_id;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route(
            "/tasks/:id/communications",
            get(list_communications).post(send_message),
        )
        .route("/conversations", get(list_conversations))
        .with_state(deps)
}

async fn list_communications(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CommunicationData>>> {
    let messages = activities::list_communications(&user, parse_task_id(&id)?, &deps).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

async fn send_message(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<SendMessageInput>,
) -> AppResult<(StatusCode, Json<CommunicationData>)> {
    let message = activities::send_message(&user, parse_task_id(&id)?, input, &deps).await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

async fn list_conversations(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<Vec<ConversationData>>> {
    let conversations = activities::list_conversations(&user, &deps).await?;
    Ok(Json(conversations.into_iter().map(Into::into).collect()))
}
