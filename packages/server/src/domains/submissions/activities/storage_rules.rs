//! Upload limits and object paths for task files and avatars.

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::common::{AppError, TaskId, UserId};

pub const TASK_FILES_BUCKET: &str = "task-files";
pub const AVATARS_BUCKET: &str = "avatars";

pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
    "video/mp4",
    "video/quicktime",
    "video/x-msvideo",
];

/// Size first, then type: an oversized file is rejected even if its type is fine.
pub fn validate_file(content_type: &str, size: usize) -> Result<(), AppError> {
    if size > MAX_FILE_SIZE {
        return Err(AppError::PayloadTooLarge(
            "File size must be less than 50MB".to_string(),
        ));
    }
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(AppError::UnsupportedMediaType(
            "File type not allowed. Please upload images, documents, or videos only.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_avatar(content_type: &str, size: usize) -> Result<(), AppError> {
    validate_file(content_type, size)?;
    if !content_type.starts_with("image/") {
        return Err(AppError::UnsupportedMediaType(
            "Avatar must be an image file".to_string(),
        ));
    }
    Ok(())
}

/// Declared content type, or a guess from the file name when the client sent none.
pub fn resolve_content_type(declared: Option<&str>, file_name: &str) -> String {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_ascii_lowercase(),
        _ => mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string(),
    }
}

/// Extension from the file name, falling back to one implied by the content type.
pub fn file_extension(file_name: &str, content_type: &str) -> String {
    let from_name = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name
        .or_else(|| {
            mime_guess::get_mime_extensions_str(content_type)
                .and_then(|exts| exts.first())
                .map(|ext| ext.to_string())
        })
        .unwrap_or_else(|| "bin".to_string())
}

/// `tasks/{task_id}/{millis}-{random}.{ext}`
pub fn task_file_path(task_id: TaskId, millis: i64, ext: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect::<String>()
        .to_ascii_lowercase();
    format!("tasks/{}/{}-{}.{}", task_id, millis, suffix, ext)
}

/// `avatars/avatar-{user_id}.{ext}`
pub fn avatar_path(user_id: UserId, ext: &str) -> String {
    format!("avatars/avatar-{}.{}", user_id, ext)
}

/// Task id encoded in a task-file path
pub fn task_id_from_path(path: &str) -> Option<TaskId> {
    let mut parts = path.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("tasks"), Some(id), Some(name)) if !name.is_empty() => TaskId::parse(id).ok(),
        _ => None,
    }
}

pub fn is_own_avatar(path: &str, user_id: UserId) -> bool {
    path.strip_prefix("avatars/")
        .and_then(|name| name.strip_prefix(&format!("avatar-{}.", user_id)))
        .map(|ext| !ext.is_empty() && !ext.contains('/'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_size_limit() {
        assert!(validate_file("application/pdf", MAX_FILE_SIZE).is_ok());
        let err = validate_file("application/pdf", MAX_FILE_SIZE + 1).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_validate_file_type() {
        assert!(validate_file("video/quicktime", 10).is_ok());
        let err = validate_file("application/zip", 10).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_validate_avatar_requires_image() {
        assert!(validate_avatar("image/png", 10).is_ok());
        assert!(matches!(
            validate_avatar("application/pdf", 10).unwrap_err(),
            AppError::UnsupportedMediaType(_)
        ));
    }

    #[test]
    fn test_resolve_content_type() {
        assert_eq!(resolve_content_type(Some("image/PNG"), "x"), "image/png");
        assert_eq!(resolve_content_type(None, "report.pdf"), "application/pdf");
        assert_eq!(
            resolve_content_type(Some("application/octet-stream"), "notes.txt"),
            "text/plain"
        );
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Contract.PDF", "application/pdf"), "pdf");
        assert_eq!(file_extension("noext", "image/png"), "png");
        assert_eq!(file_extension("weird.", "application/x-unknown"), "bin");
    }

    #[test]
    fn test_task_file_path_round_trip() {
        let task_id = TaskId::new();
        let path = task_file_path(task_id, 1_700_000_000_000, "pdf");
        assert!(path.starts_with(&format!("tasks/{}/1700000000000-", task_id)));
        assert!(path.ends_with(".pdf"));
        assert_eq!(task_id_from_path(&path), Some(task_id));
        assert_eq!(task_id_from_path("avatars/a.png"), None);
    }

    #[test]
    fn test_is_own_avatar() {
        let user_id = UserId::new();
        assert!(is_own_avatar(&avatar_path(user_id, "png"), user_id));
        assert!(!is_own_avatar(&avatar_path(UserId::new(), "png"), user_id));
        assert!(!is_own_avatar("avatars/other.png", user_id));
    }
}
