use std::collections::HashSet;

use uuid::Uuid;

use crate::common::AppError;
use crate::domains::templates::models::TemplateTask;

/// Clean up template tasks before they are stored.
///
/// Titles are trimmed and required. Missing ids get a fresh UUID. Tasks are
/// stably sorted by the given `order_index` and renumbered `1..=n`.
pub fn normalize_tasks(mut tasks: Vec<TemplateTask>) -> Result<Vec<TemplateTask>, AppError> {
    let mut seen = HashSet::new();

    for task in tasks.iter_mut() {
        task.title = task.title.trim().to_string();
        if task.title.is_empty() {
            return Err(AppError::bad_request("Every template task needs a title"));
        }

        task.id = task.id.trim().to_string();
        if task.id.is_empty() {
            task.id = Uuid::new_v4().to_string();
        }
        if !seen.insert(task.id.clone()) {
            return Err(AppError::bad_request(format!(
                "Duplicate template task id '{}'",
                task.id
            )));
        }
    }

    // sort_by_key is stable: equal indices keep their submitted order
    tasks.sort_by_key(|task| task.order_index);
    renumber(&mut tasks);
    Ok(tasks)
}

pub(crate) fn renumber(tasks: &mut [TemplateTask]) {
    for (position, task) in tasks.iter_mut().enumerate() {
        task.order_index = position as i32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tasks::models::TaskType;

    fn task(id: &str, title: &str, order_index: i32) -> TemplateTask {
        TemplateTask {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            task_type: TaskType::ManualTask,
            order_index,
            required: true,
            estimated_duration: None,
            instructions: None,
            metadata: None,
        }
    }

    #[test]
    fn test_sorts_and_renumbers() {
        let tasks = vec![task("c", "Third", 30), task("a", "First", 10), task("b", "Second", 20)];
        let normalized = normalize_tasks(tasks).unwrap();

        let ids: Vec<&str> = normalized.iter().map(|t| t.id.as_str()).collect();
        let indices: Vec<i32> = normalized.iter().map(|t| t.order_index).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_ties_keep_submitted_order() {
        let tasks = vec![task("x", "X", 0), task("y", "Y", 0), task("z", "Z", 0)];
        let normalized = normalize_tasks(tasks).unwrap();
        let ids: Vec<&str> = normalized.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_assigns_missing_ids() {
        let normalized = normalize_tasks(vec![task("", "Untitled id", 1)]).unwrap();
        assert!(Uuid::parse_str(&normalized[0].id).is_ok());
    }

    #[test]
    fn test_rejects_blank_title() {
        let result = normalize_tasks(vec![task("a", "   ", 1)]);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = normalize_tasks(vec![task("a", "One", 1), task("a", "Two", 2)]);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
