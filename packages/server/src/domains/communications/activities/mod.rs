pub mod messages;

pub use messages::{list_communications, list_conversations, send_message};
