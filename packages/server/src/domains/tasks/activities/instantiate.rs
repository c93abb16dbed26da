use anyhow::Result;
use sqlx::PgConnection;

use crate::common::ClientId;
use crate::domains::tasks::models::{CreateTask, Task};
use crate::domains::templates::Template;

/// Copy a template's tasks onto a client, after any tasks it already has.
///
/// Runs on the caller's connection so client creation and template
/// application commit together.
pub async fn instantiate_template(
    client_id: ClientId,
    template: &Template,
    conn: &mut PgConnection,
) -> Result<Vec<Task>> {
    let start = Task::next_order_index(client_id, conn).await?;

    let mut blueprints = template.tasks.0.clone();
    blueprints.sort_by_key(|t| t.order_index);

    let mut created = Vec::with_capacity(blueprints.len());
    for (offset, blueprint) in blueprints.into_iter().enumerate() {
        let task = Task::create(
            CreateTask::builder()
                .client_id(client_id)
                .title(blueprint.title)
                .description(blueprint.description)
                .task_type(blueprint.task_type)
                .order_index(start + offset as i32)
                .required(blueprint.required)
                .template_task_id(Some(blueprint.id))
                .estimated_duration(blueprint.estimated_duration)
                .instructions(blueprint.instructions)
                .metadata(blueprint.metadata.unwrap_or_else(|| serde_json::json!({})))
                .build(),
            conn,
        )
        .await?;
        created.push(task);
    }

    tracing::debug!(
        client_id = %client_id,
        template_id = %template.id,
        count = created.len(),
        "Template instantiated"
    );
    Ok(created)
}
