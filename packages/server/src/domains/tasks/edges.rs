use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::common::{AppError, AppResult, ClientId, TaskId};
use crate::domains::tasks::activities;
use crate::domains::tasks::data::{
    AgencyTaskData, AgencyTaskFilter, CreateTaskInput, MoveTaskInput, ReorderTasksInput,
};
use crate::domains::tasks::models::UpdateTaskParams;
use crate::domains::tasks::{TaskData, TaskSummary};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route(
            "/clients/:id/tasks",
            get(list_client_tasks).post(create_task),
        )
        .route("/clients/:id/tasks/order", put(reorder_tasks))
        .route("/clients/:id/tasks/move", post(move_task))
        .route("/tasks", get(list_agency_tasks))
        .route("/tasks/summary", get(task_summary))
        .route(
            "/tasks/:id",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .with_state(deps)
}

pub(crate) fn parse_task_id(raw: &str) -> Result<TaskId, AppError> {
    TaskId::parse(raw).map_err(|_| AppError::not_found("Task not found"))
}

fn parse_client_id(raw: &str) -> Result<ClientId, AppError> {
    ClientId::parse(raw).map_err(|_| AppError::not_found("Client not found"))
}

fn to_data(tasks: Vec<crate::domains::tasks::Task>) -> Vec<TaskData> {
    tasks.into_iter().map(Into::into).collect()
}

async fn list_client_tasks(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<TaskData>>> {
    let tasks = activities::list_client_tasks(&user, parse_client_id(&id)?, &deps).await?;
    Ok(Json(to_data(tasks)))
}

async fn create_task(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<CreateTaskInput>,
) -> AppResult<(StatusCode, Json<TaskData>)> {
    let task = activities::create_task(&user, parse_client_id(&id)?, input, &deps).await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

async fn reorder_tasks(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<ReorderTasksInput>,
) -> AppResult<Json<Vec<TaskData>>> {
    let ordered = input
        .task_ids
        .iter()
        .map(|raw| TaskId::parse(raw))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| AppError::bad_request("Task ids must be UUIDs"))?;
    let tasks = activities::reorder_tasks(&user, parse_client_id(&id)?, ordered, &deps).await?;
    Ok(Json(to_data(tasks)))
}

async fn move_task(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<MoveTaskInput>,
) -> AppResult<Json<Vec<TaskData>>> {
    let tasks =
        activities::move_task(&user, parse_client_id(&id)?, input.from, input.to, &deps).await?;
    Ok(Json(to_data(tasks)))
}

async fn list_agency_tasks(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Query(filter): Query<AgencyTaskFilter>,
) -> AppResult<Json<Vec<AgencyTaskData>>> {
    let tasks = activities::list_agency_tasks(&user, filter, &deps).await?;
    Ok(Json(tasks.into_iter().map(Into::into).collect()))
}

async fn task_summary(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<TaskSummary>> {
    Ok(Json(activities::task_summary(&user, &deps).await?))
}

async fn get_task(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<TaskData>> {
    let (task, _) = activities::visible_task(&user, parse_task_id(&id)?, &deps).await?;
    Ok(Json(task.into()))
}

async fn update_task(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(params): Json<UpdateTaskParams>,
) -> AppResult<Json<TaskData>> {
    let task = activities::update_task(&user, parse_task_id(&id)?, params, &deps).await?;
    Ok(Json(task.into()))
}

async fn delete_task(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    activities::delete_task(&user, parse_task_id(&id)?, &deps).await?;
    Ok(StatusCode::NO_CONTENT)
}
