//! Template CRUD, scoped to the caller's agency.

use crate::common::ordering::validate_permutation;
use crate::common::text::non_blank;
use crate::common::{Actor, AppError, AppResult, Capability, TemplateId};
use crate::domains::templates::activities::normalize::{normalize_tasks, renumber};
use crate::domains::templates::data::{CreateTemplateInput, UpdateTemplateInput};
use crate::domains::templates::models::{CreateTemplate, Template, UpdateTemplateParams};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

fn require_manage(user: &AuthUser) -> AppResult<()> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageTemplates)
        .check()?;
    Ok(())
}

pub async fn list_templates(user: &AuthUser, deps: &ServerDeps) -> AppResult<Vec<Template>> {
    require_manage(user)?;
    Ok(Template::list_for_agency(user.agency_id, &deps.db_pool).await?)
}

pub async fn find_template(
    user: &AuthUser,
    id: TemplateId,
    deps: &ServerDeps,
) -> AppResult<Template> {
    require_manage(user)?;
    Template::find_in_agency(id, user.agency_id, &deps.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Template not found"))
}

pub async fn create_template(
    user: &AuthUser,
    input: CreateTemplateInput,
    deps: &ServerDeps,
) -> AppResult<Template> {
    require_manage(user)?;

    let name = non_blank(Some(&input.name))
        .ok_or_else(|| AppError::bad_request("Template name is required"))?;
    let tasks = normalize_tasks(input.tasks)?;

    let template = Template::create(
        CreateTemplate::builder()
            .agency_id(user.agency_id)
            .name(name)
            .description(non_blank(input.description.as_deref()))
            .tasks(tasks)
            .is_active(input.is_active.unwrap_or(true))
            .build(),
        &deps.db_pool,
    )
    .await?;

    tracing::info!(
        template_id = %template.id,
        task_count = template.tasks.0.len(),
        "Template created"
    );
    Ok(template)
}

pub async fn update_template(
    user: &AuthUser,
    id: TemplateId,
    input: UpdateTemplateInput,
    deps: &ServerDeps,
) -> AppResult<Template> {
    let existing = find_template(user, id, deps).await?;

    let name = match input.name {
        Some(name) => Some(
            non_blank(Some(&name)).ok_or_else(|| AppError::bad_request("Template name is required"))?,
        ),
        None => None,
    };
    let tasks = input.tasks.map(normalize_tasks).transpose()?;

    let params = UpdateTemplateParams {
        name,
        description: input.description,
        tasks,
        is_active: input.is_active,
    };
    Ok(Template::update(existing.id, params, &deps.db_pool).await?)
}

pub async fn delete_template(user: &AuthUser, id: TemplateId, deps: &ServerDeps) -> AppResult<()> {
    require_manage(user)?;
    if !Template::delete(id, user.agency_id, &deps.db_pool).await? {
        return Err(AppError::not_found("Template not found"));
    }
    tracing::info!(template_id = %id, "Template deleted");
    Ok(())
}

/// Reorder a template's tasks to match `task_ids` (a permutation of the current ids)
pub async fn reorder_template_tasks(
    user: &AuthUser,
    id: TemplateId,
    task_ids: Vec<String>,
    deps: &ServerDeps,
) -> AppResult<Template> {
    let template = find_template(user, id, deps).await?;
    let mut tasks = template.tasks.0;

    let current: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
    validate_permutation(&current, &task_ids).map_err(|e| AppError::bad_request(e.to_string()))?;

    tasks.sort_by_key(|task| task_ids.iter().position(|id| *id == task.id));
    renumber(&mut tasks);

    let params = UpdateTemplateParams {
        tasks: Some(tasks),
        ..Default::default()
    };
    Ok(Template::update(template.id, params, &deps.db_pool).await?)
}
