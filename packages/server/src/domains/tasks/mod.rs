//! Tasks domain - per-client onboarding checklists, their ordering and the
//! completion webhook.

pub mod activities;
pub mod data;
pub mod edges;
pub mod models;
pub mod webhook;

pub use data::{TaskData, TaskSummary};
pub use edges::router;
pub use models::{Task, TaskStatus, TaskType};
