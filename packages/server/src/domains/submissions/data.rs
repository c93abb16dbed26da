use serde::{Deserialize, Serialize};

use crate::common::text::format_file_size;
use crate::domains::submissions::models::{SubmissionType, TaskSubmission};

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTaskInput {
    pub submission_type: SubmissionType,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionData {
    pub id: String,
    pub task_id: String,
    pub client_id: String,
    pub submission_type: SubmissionType,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub file_size_label: Option<String>,
    pub metadata: serde_json::Value,
    pub submitted_at: String,
}

impl From<TaskSubmission> for SubmissionData {
    fn from(submission: TaskSubmission) -> Self {
        Self {
            id: submission.id.to_string(),
            task_id: submission.task_id.to_string(),
            client_id: submission.client_id.to_string(),
            submission_type: submission.submission_type,
            content: submission.content,
            file_url: submission.file_url,
            file_name: submission.file_name,
            file_size_label: submission
                .file_size
                .map(|size| format_file_size(size.max(0) as u64)),
            file_size: submission.file_size,
            metadata: submission.metadata.0,
            submitted_at: submission.submitted_at.to_rfc3339(),
        }
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub path: String,
    pub bucket: String,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub size_label: String,
}
