//! Typed ids for every persisted entity.

pub use super::id::{Id, V7};

pub struct Agency;
pub struct User;
pub struct Client;
pub struct Template;
pub struct Task;
pub struct TaskSubmission;
pub struct Communication;
pub struct Notification;
pub struct MagicLink;

pub type AgencyId = Id<Agency>;
pub type UserId = Id<User>;
pub type ClientId = Id<Client>;
pub type TemplateId = Id<Template>;
pub type TaskId = Id<Task>;
pub type SubmissionId = Id<TaskSubmission>;
pub type CommunicationId = Id<Communication>;
pub type NotificationId = Id<Notification>;
pub type MagicLinkId = Id<MagicLink>;
