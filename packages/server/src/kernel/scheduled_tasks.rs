//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (every hour, minute 5)
//!     └─► Task::find_overdue_unnotified()
//!             └─► notify assigned user → mark task as reported
//!
//! Scheduler (daily, 03:30)
//!     └─► MagicLink::delete_stale()
//! ```

use anyhow::Result;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::auth::models::MagicLink;
use crate::domains::notifications::activities::notify_task_overdue;
use crate::domains::tasks::models::Task;

/// Start all scheduled tasks
pub async fn start_scheduler(pool: PgPool) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let overdue_pool = pool.clone();
    let overdue_job = Job::new_async("0 5 * * * *", move |_uuid, _lock| {
        let pool = overdue_pool.clone();
        Box::pin(async move {
            if let Err(e) = run_overdue_scan(&pool).await {
                tracing::error!("Overdue task scan failed: {}", e);
            }
        })
    })?;
    scheduler.add(overdue_job).await?;

    let cleanup_pool = pool.clone();
    let cleanup_job = Job::new_async("0 30 3 * * *", move |_uuid, _lock| {
        let pool = cleanup_pool.clone();
        Box::pin(async move {
            if let Err(e) = run_magic_link_cleanup(&pool).await {
                tracing::error!("Magic link cleanup failed: {}", e);
            }
        })
    })?;
    scheduler.add(cleanup_job).await?;

    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (overdue scan hourly, magic link cleanup daily)");
    Ok(scheduler)
}

/// Notify assigned users about tasks that went past their due date.
///
/// Each task is reported once; `overdue_notified_at` is stamped afterwards.
pub async fn run_overdue_scan(pool: &PgPool) -> Result<usize> {
    let overdue = Task::find_overdue_unnotified(pool).await?;
    if overdue.is_empty() {
        tracing::debug!("No newly overdue tasks");
        return Ok(0);
    }

    for task in &overdue {
        notify_task_overdue(task.assigned_user_id, task.id, &task.title, &task.client_name, pool)
            .await;
        Task::mark_overdue_notified(task.id, pool).await?;
    }

    tracing::info!(count = overdue.len(), "Overdue task notifications sent");
    Ok(overdue.len())
}

async fn run_magic_link_cleanup(pool: &PgPool) -> Result<()> {
    let removed = MagicLink::delete_stale(pool).await?;
    tracing::info!(removed, "Stale magic links removed");
    Ok(())
}
