//! Local-disk object store
//!
//! Development backend that writes objects under a root directory and serves
//! them through the API's static file route. URLs take the form
//! `{public_base}/{key}`, e.g. `/uploads/banners/1700000000000-sale.png`.

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::ObjectStore;

/// Object store backed by a directory on the local filesystem
pub struct LocalStore {
    root: PathBuf,
    public_base: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Directory objects are stored under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a key to a path under the root, rejecting traversal
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let traversal = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if traversal || key.is_empty() {
            bail!("invalid object key: {}", key);
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        debug!(key, size = bytes.len(), "Writing object to disk");

        fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write object {}", path.display()))?;

        Ok(format!("{}/{}", self.public_base, key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to delete object {}", path.display()))
            }
        }
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_base)
            .map(|rest| rest.trim_start_matches('/').to_string())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "/uploads");

        let url = store
            .put("banners/1-test.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(url, "/uploads/banners/1-test.png");

        let stored = dir.path().join("banners/1-test.png");
        assert_eq!(std::fs::read(&stored).unwrap(), vec![1, 2, 3]);

        store.delete("banners/1-test.png").await.unwrap();
        assert!(!stored.exists());
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "/uploads");

        assert!(store.delete("banners/never-existed.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "/uploads");

        assert!(store.put("../escape.png", vec![0], "image/png").await.is_err());
        assert!(store.put("", vec![0], "image/png").await.is_err());
        assert!(store.delete("/etc/passwd").await.is_err());
    }

    #[test]
    fn test_key_for_url() {
        let store = LocalStore::new("/tmp/uploads", "/uploads");

        assert_eq!(
            store.key_for_url("/uploads/banners/1-test.png").as_deref(),
            Some("banners/1-test.png")
        );
        assert_eq!(store.key_for_url("https://elsewhere/banners/x.png"), None);
        assert_eq!(store.key_for_url("/uploads/"), None);
    }
}
