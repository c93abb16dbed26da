use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::common::{AppError, AppResult, Role, UserId};
use crate::domains::users::activities::{self, InviteEmployee};
use crate::domains::users::UserData;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
struct ChangeRoleInput {
    role: Role,
}

pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/employees", get(list_employees))
        .route("/employees/invite", post(invite_employee))
        .route("/employees/:id/role", patch(change_role))
        .route("/employees/:id", delete(remove_employee))
        .with_state(deps)
}

fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
    UserId::parse(raw).map_err(|_| AppError::not_found("Employee not found"))
}

async fn list_employees(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<Vec<UserData>>> {
    let employees = activities::list_employees(&user, &deps).await?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

async fn invite_employee(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Json(input): Json<InviteEmployee>,
) -> AppResult<(StatusCode, Json<UserData>)> {
    let employee = activities::invite_employee(&user, input, &deps).await?;
    Ok((StatusCode::CREATED, Json(employee.into())))
}

async fn change_role(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<ChangeRoleInput>,
) -> AppResult<Json<UserData>> {
    let employee = activities::change_role(&user, parse_user_id(&id)?, input.role, &deps).await?;
    Ok(Json(employee.into()))
}

async fn remove_employee(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    activities::remove_employee(&user, parse_user_id(&id)?, &deps).await?;
    Ok(StatusCode::NO_CONTENT)
}
