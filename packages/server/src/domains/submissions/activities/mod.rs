pub mod files;
pub mod storage_rules;
pub mod submit;

pub use files::{delete_file, upload_avatar, upload_task_file, FileUpload};
pub use submit::{list_submissions, submit_task};
