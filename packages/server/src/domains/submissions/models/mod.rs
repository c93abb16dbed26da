pub mod submission;

pub use submission::{CreateSubmission, SubmissionType, TaskSubmission};
