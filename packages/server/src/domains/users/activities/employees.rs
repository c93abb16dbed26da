//! Agency staff management. Only the owner may change the team.

use serde::Deserialize;

use crate::common::text::{is_valid_email, non_blank, normalize_email};
use crate::common::{Actor, AppError, AppResult, Capability, Role, UserId};
use crate::domains::auth::activities::issue_magic_link;
use crate::domains::users::{CreateUser, User};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

#[derive(Debug, Clone, Deserialize)]
pub struct InviteEmployee {
    pub email: String,
    pub full_name: String,
    pub role: Option<Role>,
}

pub async fn list_employees(user: &AuthUser, deps: &ServerDeps) -> AppResult<Vec<User>> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageClients)
        .check()?;
    Ok(User::list_staff(user.agency_id, &deps.db_pool).await?)
}

/// Create an admin (or owner-assigned role) and email them a sign-in link.
pub async fn invite_employee(
    user: &AuthUser,
    input: InviteEmployee,
    deps: &ServerDeps,
) -> AppResult<User> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageEmployees)
        .check()?;

    let role = input.role.unwrap_or(Role::AgencyAdmin);
    if role != Role::AgencyAdmin {
        return Err(AppError::bad_request("Employees can only be invited as agency_admin"));
    }

    let email = normalize_email(&input.email);
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("A valid email is required"));
    }
    let full_name = non_blank(Some(&input.full_name))
        .ok_or_else(|| AppError::bad_request("Full name is required"))?;

    if User::email_taken(&email, &deps.db_pool).await? {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let mut conn = deps.db_pool.acquire().await.map_err(AppError::from)?;
    let employee = User::create(
        CreateUser::builder()
            .email(email)
            .full_name(full_name)
            .role(role)
            .agency_id(user.agency_id)
            .build(),
        &mut *conn,
    )
    .await?;

    // Without a delivered link the invite is unusable; drop the account so it can be retried.
    if let Err(err) = issue_magic_link(&employee, deps).await {
        tracing::warn!(employee_id = %employee.id, error = %err, "Invite email failed");
        User::delete(employee.id, &mut *conn).await?;
        return Err(err);
    }
    drop(conn);

    tracing::info!(
        agency_id = %user.agency_id,
        employee_id = %employee.id,
        "Employee invited"
    );
    Ok(employee)
}

pub async fn change_role(
    user: &AuthUser,
    employee_id: UserId,
    role: Role,
    deps: &ServerDeps,
) -> AppResult<User> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageEmployees)
        .check()?;

    if role == Role::Client {
        return Err(AppError::bad_request("Staff cannot be given the client role"));
    }
    if employee_id == user.user_id {
        return Err(AppError::bad_request("You cannot change your own role"));
    }

    let employee = find_staff(user, employee_id, deps).await?;
    if employee.role == Role::AgencyOwner {
        return Err(AppError::bad_request("The agency owner's role cannot be changed"));
    }

    Ok(User::set_role(employee.id, role, &deps.db_pool).await?)
}

pub async fn remove_employee(
    user: &AuthUser,
    employee_id: UserId,
    deps: &ServerDeps,
) -> AppResult<()> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageEmployees)
        .check()?;

    if employee_id == user.user_id {
        return Err(AppError::bad_request("You cannot remove yourself"));
    }

    let employee = find_staff(user, employee_id, deps).await?;
    if employee.role == Role::AgencyOwner {
        return Err(AppError::bad_request("An agency owner cannot be removed"));
    }

    let mut conn = deps.db_pool.acquire().await.map_err(AppError::from)?;
    User::delete(employee.id, &mut *conn).await?;
    tracing::info!(agency_id = %user.agency_id, employee_id = %employee.id, "Employee removed");
    Ok(())
}

async fn find_staff(user: &AuthUser, employee_id: UserId, deps: &ServerDeps) -> AppResult<User> {
    User::find_in_agency(employee_id, user.agency_id, &deps.db_pool)
        .await?
        .filter(|u| u.role.is_staff())
        .ok_or_else(|| AppError::not_found("Employee not found"))
}
