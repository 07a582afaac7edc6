//! Durable key/value storage
//!
//! The session store persists two values between runs: the session record and the
//! session schema version marker. This module provides:
//! - `SessionStorage` trait defining the interface
//! - `FileStorage`, one file per key under a data directory
//! - `MemoryStorage`, for tests and ephemeral runs

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Key of the persisted session record
pub const SESSION_KEY: &str = "admin_console_session";

/// Key of the session schema version marker
pub const SESSION_VERSION_KEY: &str = "admin_console_session_version";

/// Key/value storage that survives restarts
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read a value; `None` when the key was never written or has been removed
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed storage writing `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a boxed storage for use with dependency injection
    pub fn boxed(dir: impl Into<PathBuf>) -> Arc<dyn SessionStorage> {
        Arc::new(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file))
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", self.dir.display()))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Arc<dyn SessionStorage> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_storage_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get(SESSION_KEY).await.unwrap(), None);

        storage.set(SESSION_KEY, r#"{"token":"t"}"#).await.unwrap();
        assert_eq!(
            storage.get(SESSION_KEY).await.unwrap().as_deref(),
            Some(r#"{"token":"t"}"#)
        );
        assert!(dir.path().join("nested/admin_console_session.json").exists());

        storage.set(SESSION_KEY, "2").await.unwrap();
        assert_eq!(storage.get(SESSION_KEY).await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_file_storage_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.set(SESSION_VERSION_KEY, "1").await.unwrap();
        storage.remove(SESSION_VERSION_KEY).await.unwrap();
        storage.remove(SESSION_VERSION_KEY).await.unwrap();
        assert_eq!(storage.get(SESSION_VERSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_storage_sanitizes_keys() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.set("../escape", "x").await.unwrap();
        assert!(dir.path().join("___escape.json").exists());
        assert_eq!(storage.get("../escape").await.unwrap().as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set("a", "1").await.unwrap();
        assert_eq!(storage.get("a").await.unwrap().as_deref(), Some("1"));
        storage.remove("a").await.unwrap();
        storage.remove("a").await.unwrap();
        assert_eq!(storage.get("a").await.unwrap(), None);
    }
}
