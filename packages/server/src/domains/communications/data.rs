use serde::{Deserialize, Serialize};

use crate::common::Role;
use crate::domains::communications::models::{CommunicationWithSender, Conversation};

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageInput {
    pub message: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationData {
    pub id: String,
    pub task_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_avatar_url: Option<String>,
    pub sender_role: Role,
    pub message: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub created_at: String,
}

impl From<CommunicationWithSender> for CommunicationData {
    fn from(row: CommunicationWithSender) -> Self {
        let message = row.communication;
        Self {
            id: message.id.to_string(),
            task_id: message.task_id.to_string(),
            sender_id: message.sender_id.to_string(),
            sender_name: row.sender_name,
            sender_avatar_url: row.sender_avatar_url,
            sender_role: row.sender_role,
            message: message.message,
            file_url: message.file_url,
            file_name: message.file_name,
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationData {
    pub task_id: String,
    pub task_title: String,
    pub client_id: String,
    pub client_name: String,
    pub last_message: String,
    pub last_message_at: String,
    pub last_sender_id: String,
    pub message_count: i64,
}

impl From<Conversation> for ConversationData {
    fn from(row: Conversation) -> Self {
        Self {
            task_id: row.task_id.to_string(),
            task_title: row.task_title,
            client_id: row.client_id.to_string(),
            client_name: row.client_name,
            last_message: row.last_message,
            last_message_at: row.last_message_at.to_rfc3339(),
            last_sender_id: row.last_sender_id.to_string(),
            message_count: row.message_count,
        }
    }
}
