use serde::{Deserialize, Serialize};

use crate::domains::notifications::models::{Notification, NotificationType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationData {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub read: bool,
    pub related_task_id: Option<String>,
    pub created_at: String,
}

impl From<Notification> for NotificationData {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.to_string(),
            title: n.title,
            message: n.message,
            notification_type: n.notification_type,
            read: n.read,
            related_task_id: n.related_task_id.map(|id| id.to_string()),
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationList {
    pub notifications: Vec<NotificationData>,
    pub unread_count: i64,
}
