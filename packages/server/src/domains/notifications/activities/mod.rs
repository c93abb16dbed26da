pub mod notify;

pub use notify::{
    list_notifications, mark_all_read, mark_read, notify_message_received, notify_task_assigned,
    notify_task_completed, notify_task_overdue,
};
