//! Submissions domain - client work product for tasks and the files behind it.

pub mod activities;
pub mod data;
pub mod edges;
pub mod models;

pub use data::{SubmissionData, UploadedFile};
pub use edges::router;
pub use models::{CreateSubmission, SubmissionType, TaskSubmission};
