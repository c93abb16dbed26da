pub mod communication;

pub use communication::{Communication, CommunicationWithSender, Conversation, CreateCommunication};
