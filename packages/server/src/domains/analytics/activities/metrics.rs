use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::common::{Actor, AppResult, Capability};
use crate::domains::analytics::data::{
    AgencyAnalytics, ClientTotals, RecentActivity, TaskTotals, TimeRange,
};
use crate::domains::analytics::models::{ClientFact, TaskFact};
use crate::domains::clients::ClientStatus;
use crate::domains::tasks::TaskStatus;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub async fn agency_analytics(
    user: &AuthUser,
    range: TimeRange,
    deps: &ServerDeps,
) -> AppResult<AgencyAnalytics> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ViewAnalytics)
        .check()?;

    let clients = ClientFact::for_agency(user.agency_id, &deps.db_pool).await?;
    let tasks = TaskFact::for_agency(user.agency_id, &deps.db_pool).await?;
    Ok(compute_analytics(&clients, &tasks, range, Utc::now()))
}

fn percent(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn count<T>(items: &[T], pred: impl Fn(&T) -> bool) -> i64 {
    items.iter().filter(|item| pred(item)).count() as i64
}

pub fn compute_analytics(
    clients: &[ClientFact],
    tasks: &[TaskFact],
    range: TimeRange,
    now: DateTime<Utc>,
) -> AgencyAnalytics {
    let client_totals = ClientTotals {
        total: clients.len() as i64,
        active: count(clients, |c| c.status == ClientStatus::Active),
        completed: count(clients, |c| c.status == ClientStatus::Completed),
    };

    let task_totals = TaskTotals {
        total: tasks.len() as i64,
        completed: count(tasks, |t| t.status == TaskStatus::Completed),
        pending: count(tasks, |t| {
            matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress)
        }),
        overdue: count(tasks, |t| {
            t.status != TaskStatus::Completed && t.due_date.map(|due| due < now).unwrap_or(false)
        }),
    };

    let mut task_type_breakdown = BTreeMap::new();
    for task in tasks {
        *task_type_breakdown
            .entry(task.task_type.as_str().to_string())
            .or_insert(0) += 1;
    }

    let cutoff = now - range.duration();
    let recent_activity = RecentActivity {
        new_clients: count(clients, |c| c.created_at > cutoff),
        new_tasks: count(tasks, |t| t.created_at > cutoff),
        completed_tasks: count(tasks, |t| {
            t.status == TaskStatus::Completed && t.updated_at > cutoff
        }),
    };

    AgencyAnalytics {
        range,
        completion_rate: percent(task_totals.completed, task_totals.total),
        client_completion_rate: percent(client_totals.completed, client_totals.total),
        clients: client_totals,
        tasks: task_totals,
        task_type_breakdown,
        recent_activity,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domains::tasks::TaskType;

    fn client(status: ClientStatus, age_days: i64, now: DateTime<Utc>) -> ClientFact {
        ClientFact {
            status,
            created_at: now - Duration::days(age_days),
        }
    }

    fn task(
        status: TaskStatus,
        task_type: TaskType,
        due_in_days: Option<i64>,
        age_days: i64,
        now: DateTime<Utc>,
    ) -> TaskFact {
        TaskFact {
            status,
            task_type,
            due_date: due_in_days.map(|d| now + Duration::days(d)),
            created_at: now - Duration::days(age_days),
            updated_at: now - Duration::days(age_days / 2),
        }
    }

    #[test]
    fn test_empty_agency_has_zero_rates() {
        let result = compute_analytics(&[], &[], TimeRange::Month, Utc::now());
        assert_eq!(result.completion_rate, 0.0);
        assert_eq!(result.client_completion_rate, 0.0);
        assert!(result.task_type_breakdown.is_empty());
    }

    #[test]
    fn test_totals_and_rates() {
        let now = Utc::now();
        let clients = vec![
            client(ClientStatus::Active, 3, now),
            client(ClientStatus::Completed, 40, now),
            client(ClientStatus::Inactive, 100, now),
            client(ClientStatus::Completed, 200, now),
        ];
        let tasks = vec![
            task(TaskStatus::Completed, TaskType::ManualTask, Some(-2), 10, now),
            task(TaskStatus::Pending, TaskType::ManualTask, Some(-1), 2, now),
            task(TaskStatus::InProgress, TaskType::DocumentUpload, Some(5), 50, now),
            task(TaskStatus::Blocked, TaskType::FormCompletion, None, 400, now),
        ];

        let result = compute_analytics(&clients, &tasks, TimeRange::Month, now);

        assert_eq!(result.clients, ClientTotals { total: 4, active: 1, completed: 2 });
        assert_eq!(
            result.tasks,
            TaskTotals { total: 4, completed: 1, pending: 2, overdue: 1 }
        );
        assert_eq!(result.completion_rate, 25.0);
        assert_eq!(result.client_completion_rate, 50.0);
        assert_eq!(result.task_type_breakdown.get("manual_task"), Some(&2));
        assert_eq!(result.task_type_breakdown.get("document_upload"), Some(&1));
    }

    #[test]
    fn test_recent_activity_respects_range() {
        let now = Utc::now();
        let clients = vec![client(ClientStatus::Active, 3, now), client(ClientStatus::Active, 20, now)];
        let tasks = vec![
            task(TaskStatus::Completed, TaskType::ManualTask, None, 4, now),
            task(TaskStatus::Completed, TaskType::ManualTask, None, 60, now),
        ];

        let week = compute_analytics(&clients, &tasks, TimeRange::Week, now);
        assert_eq!(
            week.recent_activity,
            RecentActivity { new_clients: 1, new_tasks: 1, completed_tasks: 1 }
        );

        let year = compute_analytics(&clients, &tasks, TimeRange::Year, now);
        assert_eq!(
            year.recent_activity,
            RecentActivity { new_clients: 2, new_tasks: 2, completed_tasks: 2 }
        );
    }

    #[test]
    fn test_time_range_parsing() {
        assert_eq!("7d".parse::<TimeRange>(), Ok(TimeRange::Week));
        assert_eq!("1y".parse::<TimeRange>(), Ok(TimeRange::Year));
        assert!("2w".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::default(), TimeRange::Month);
    }
}
