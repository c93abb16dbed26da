//! Communications domain - per-task message threads between an agency and its client.

pub mod activities;
pub mod data;
pub mod edges;
pub mod models;

pub use data::{CommunicationData, ConversationData};
pub use edges::router;
pub use models::{Communication, CommunicationWithSender, Conversation};
