use serde::{Deserialize, Serialize};

use crate::domains::templates::models::{Template, TemplateTask};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateInput {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TemplateTask>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tasks: Option<Vec<TemplateTask>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderTemplateTasksInput {
    pub task_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateData {
    pub id: String,
    pub agency_id: String,
    pub name: String,
    pub description: Option<String>,
    pub tasks: Vec<TemplateTask>,
    pub task_count: usize,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Template> for TemplateData {
    fn from(template: Template) -> Self {
        let tasks = template.tasks.0;
        Self {
            id: template.id.to_string(),
            agency_id: template.agency_id.to_string(),
            name: template.name,
            description: template.description,
            task_count: tasks.len(),
            tasks,
            is_active: template.is_active,
            created_at: template.created_at.to_rfc3339(),
            updated_at: template.updated_at.to_rfc3339(),
        }
    }
}
