//! Filesystem-backed object store.
//!
//! Objects live at `{root}/{bucket}/{path}` and are served by the API under
//! `/storage/{bucket}/{path}`.

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use super::{BaseObjectStore, StoredObject};

pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        let relative = Path::new(bucket).join(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || bucket.is_empty() || path.is_empty() {
            bail!("Invalid object path: {}/{}", bucket, path);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BaseObjectStore for LocalObjectStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject> {
        let target = self.resolve(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&target, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        tracing::debug!(bucket, path, content_type, size = bytes.len(), "Stored object");

        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.to_string(),
            url: self.public_url(bucket, path),
        })
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<()> {
        let target = self.resolve(bucket, path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", target.display())),
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://localhost/storage/");

        let stored = store
            .put("task-files", "tasks/abc/1-x.pdf", b"%PDF".to_vec(), "application/pdf")
            .await
            .unwrap();
        assert_eq!(stored.url, "http://localhost/storage/task-files/tasks/abc/1-x.pdf");
        assert!(dir.path().join("task-files/tasks/abc/1-x.pdf").exists());

        store.delete("task-files", "tasks/abc/1-x.pdf").await.unwrap();
        assert!(!dir.path().join("task-files/tasks/abc/1-x.pdf").exists());

        // Deleting twice is fine
        store.delete("task-files", "tasks/abc/1-x.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://localhost/storage");

        let result = store
            .put("avatars", "../../etc/passwd", b"x".to_vec(), "text/plain")
            .await;
        assert!(result.is_err());
    }
}
