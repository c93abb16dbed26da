//! Client lifecycle. Creation, portal access and template instantiation
//! commit together.

use sqlx::PgConnection;

use crate::common::text::{is_valid_email, non_blank, normalize_email};
use crate::common::{Actor, AppError, AppResult, Capability, ClientId, Role, TemplateId, UserId};
use crate::domains::auth::activities::{hash_password, MIN_PASSWORD_LENGTH};
use crate::domains::clients::activities::access::visible_client;
use crate::domains::clients::data::CreateClientInput;
use crate::domains::clients::models::{Client, ClientStatus, CreateClient, UpdateClientParams};
use crate::domains::notifications::activities::notify_task_assigned;
use crate::domains::tasks::activities::instantiate_template;
use crate::domains::tasks::Task;
use crate::domains::templates::Template;
use crate::domains::users::{CreateUser, User};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

fn require_manage(user: &AuthUser) -> AppResult<()> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageClients)
        .check()?;
    Ok(())
}

async fn agency_template(
    user: &AuthUser,
    template_id: TemplateId,
    deps: &ServerDeps,
) -> AppResult<Template> {
    Template::find_in_agency(template_id, user.agency_id, &deps.db_pool)
        .await?
        .ok_or_else(|| AppError::bad_request("Template not found"))
}

async fn ensure_assignable(user: &AuthUser, assignee: UserId, deps: &ServerDeps) -> AppResult<()> {
    let staff = User::find_in_agency(assignee, user.agency_id, &deps.db_pool)
        .await?
        .filter(|u| u.role.is_staff());
    if staff.is_none() {
        return Err(AppError::bad_request(
            "Assigned user must be a member of the agency",
        ));
    }
    Ok(())
}

/// Staff see the whole roster; a portal user sees only their own record.
pub async fn list_clients(user: &AuthUser, deps: &ServerDeps) -> AppResult<Vec<Client>> {
    if user.role == Role::Client {
        let own = Client::find_by_user(user.user_id, &deps.db_pool).await?;
        return Ok(own.into_iter().collect());
    }
    require_manage(user)?;
    Ok(Client::list_for_agency(user.agency_id, &deps.db_pool).await?)
}

pub async fn get_client(user: &AuthUser, id: ClientId, deps: &ServerDeps) -> AppResult<Client> {
    visible_client(user, id, deps).await
}

pub async fn create_client(
    user: &AuthUser,
    input: CreateClientInput,
    deps: &ServerDeps,
) -> AppResult<Client> {
    require_manage(user)?;

    let email = normalize_email(&input.email);
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("A valid email is required"));
    }
    let full_name = non_blank(Some(&input.full_name))
        .ok_or_else(|| AppError::bad_request("Full name is required"))?;

    if Client::email_taken(user.agency_id, &email, &deps.db_pool).await? {
        return Err(AppError::Conflict(
            "A client with this email already exists".to_string(),
        ));
    }

    let template = match input.onboarding_template_id {
        Some(id) => Some(agency_template(user, id, deps).await?),
        None => None,
    };
    if let Some(assignee) = input.assigned_user_id {
        ensure_assignable(user, assignee, deps).await?;
    }

    let password_hash = match input.portal_password.as_deref() {
        Some(password) => {
            if password.len() < MIN_PASSWORD_LENGTH {
                return Err(AppError::bad_request(format!(
                    "Portal password must be at least {} characters",
                    MIN_PASSWORD_LENGTH
                )));
            }
            if User::email_taken(&email, &deps.db_pool).await? {
                return Err(AppError::Conflict(
                    "An account with this email already exists".to_string(),
                ));
            }
            Some(hash_password(password).await?)
        }
        None => None,
    };

    let mut tx = deps.db_pool.begin().await.map_err(AppError::from)?;

    let portal_user = match password_hash {
        Some(hash) => Some(
            User::create(
                CreateUser::builder()
                    .email(email.clone())
                    .full_name(full_name.clone())
                    .role(Role::Client)
                    .agency_id(user.agency_id)
                    .phone(non_blank(input.phone.as_deref()))
                    .password_hash(Some(hash))
                    .build(),
                &mut *tx,
            )
            .await?,
        ),
        None => None,
    };

    let client = Client::create(
        CreateClient::builder()
            .agency_id(user.agency_id)
            .email(email)
            .full_name(full_name)
            .company_name(non_blank(input.company_name.as_deref()))
            .phone(non_blank(input.phone.as_deref()))
            .status(input.status.unwrap_or(ClientStatus::Active))
            .onboarding_template_id(template.as_ref().map(|t| t.id))
            .assigned_user_id(input.assigned_user_id)
            .user_id(portal_user.as_ref().map(|u| u.id))
            .build(),
        &mut *tx,
    )
    .await?;

    let task_count = match template.as_ref() {
        Some(template) => instantiate_template(client.id, template, &mut *tx).await?.len(),
        None => 0,
    };

    tx.commit().await.map_err(AppError::from)?;

    tracing::info!(
        client_id = %client.id,
        agency_id = %client.agency_id,
        tasks = task_count,
        portal = portal_user.is_some(),
        "Client created"
    );

    if let Some(assignee) = client.assigned_user_id {
        if task_count > 0 {
            notify_task_assigned(assignee, &client.full_name, task_count, &deps.db_pool).await;
        }
    }

    Ok(client)
}

pub async fn update_client(
    user: &AuthUser,
    id: ClientId,
    mut params: UpdateClientParams,
    deps: &ServerDeps,
) -> AppResult<Client> {
    require_manage(user)?;
    let existing = visible_client(user, id, deps).await?;

    if let Some(email) = params.email.as_deref() {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AppError::bad_request("A valid email is required"));
        }
        if !email.eq_ignore_ascii_case(&existing.email)
            && Client::email_taken(user.agency_id, &email, &deps.db_pool).await?
        {
            return Err(AppError::Conflict(
                "A client with this email already exists".to_string(),
            ));
        }
        params.email = Some(email);
    }
    if let Some(full_name) = params.full_name.as_deref() {
        params.full_name = Some(
            non_blank(Some(full_name))
                .ok_or_else(|| AppError::bad_request("Full name is required"))?,
        );
    }
    if let Some(template_id) = params.onboarding_template_id {
        agency_template(user, template_id, deps).await?;
    }
    if let Some(assignee) = params.assigned_user_id {
        ensure_assignable(user, assignee, deps).await?;
    }

    let client = Client::update(existing.id, params, &deps.db_pool).await?;

    let reassigned = client.assigned_user_id.filter(|a| existing.assigned_user_id != Some(*a));
    if let Some(assignee) = reassigned {
        let task_count = Task::list_for_client(client.id, &deps.db_pool).await?.len();
        if task_count > 0 {
            notify_task_assigned(assignee, &client.full_name, task_count, &deps.db_pool).await;
        }
    }

    Ok(client)
}

/// Delete a client and its tasks. The caller must confirm explicitly.
pub async fn delete_client(
    user: &AuthUser,
    id: ClientId,
    confirm: bool,
    deps: &ServerDeps,
) -> AppResult<()> {
    require_manage(user)?;
    if !confirm {
        return Err(AppError::bad_request(
            "Deleting a client requires confirm=true",
        ));
    }

    let client = visible_client(user, id, deps).await?;
    let mut tx = deps.db_pool.begin().await.map_err(AppError::from)?;
    if !Client::delete(client.id, user.agency_id, &mut *tx).await? {
        return Err(AppError::not_found("Client not found"));
    }
    if let Some(portal_user) = client.user_id {
        User::delete(portal_user, &mut *tx).await?;
    }
    tx.commit().await.map_err(AppError::from)?;

    tracing::info!(client_id = %client.id, "Client deleted");
    Ok(())
}

/// Append a template's tasks after the client's existing ones
pub async fn apply_template(
    user: &AuthUser,
    id: ClientId,
    template_id: TemplateId,
    deps: &ServerDeps,
) -> AppResult<Vec<Task>> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageTasks)
        .check()?;
    let client = visible_client(user, id, deps).await?;
    let template = agency_template(user, template_id, deps).await?;

    let mut tx = deps.db_pool.begin().await.map_err(AppError::from)?;
    lock_client(client.id, &mut *tx).await?;
    let created = instantiate_template(client.id, &template, &mut *tx).await?;
    tx.commit().await.map_err(AppError::from)?;

    tracing::info!(
        client_id = %client.id,
        template_id = %template.id,
        tasks = created.len(),
        "Template applied"
    );
    Ok(created)
}

async fn lock_client(id: ClientId, conn: &mut PgConnection) -> AppResult<()> {
    sqlx::query("SELECT id FROM clients WHERE id = $1 FOR UPDATE")
        .bind(id)
        .execute(conn)
        .await
        .map_err(AppError::from)?;
    Ok(())
}
