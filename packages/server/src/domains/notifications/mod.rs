//! Notifications domain - in-app notices for assignment, completion, overdue tasks and messages.

pub mod activities;
pub mod data;
pub mod edges;
pub mod models;

pub use data::{NotificationData, NotificationList};
pub use edges::router;
pub use models::{CreateNotification, Notification, NotificationType};
