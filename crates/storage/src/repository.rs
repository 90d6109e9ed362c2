use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Well-known slots of the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    /// Course materials and assignment files, as a JSON array of file refs.
    UploadedFiles,
    /// The level 5 answers document, as a single JSON file ref.
    AnswersDocument,
}

impl SessionKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKey::UploadedFiles => "uploadedFiles",
            SessionKey::AnswersDocument => "answersDocument",
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value cell that survives page changes within one session.
///
/// Writes are last-write-wins; callers keep to one writer per key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the raw payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: SessionKey) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous payload.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set(&self, key: SessionKey, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: SessionKey) -> Result<(), StorageError>;

    /// Drop every key of this session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Simple in-memory session store for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<Mutex<HashMap<SessionKey, String>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn set(&self, key: SessionKey, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: SessionKey) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clear();
        Ok(())
    }
}

/// Bundles the session store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub session: Arc<dyn SessionStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            session: Arc::new(InMemorySessionStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_write_wins() {
        let store = InMemorySessionStore::new();
        store.set(SessionKey::UploadedFiles, "[1]").await.unwrap();
        store.set(SessionKey::UploadedFiles, "[2]").await.unwrap();
        assert_eq!(
            store.get(SessionKey::UploadedFiles).await.unwrap().as_deref(),
            Some("[2]")
        );
    }

    #[tokio::test]
    async fn clear_drops_every_key() {
        let store = InMemorySessionStore::new();
        store.set(SessionKey::UploadedFiles, "[]").await.unwrap();
        store.set(SessionKey::AnswersDocument, "{}").await.unwrap();
        store.clear().await.unwrap();
        assert!(store.get(SessionKey::UploadedFiles).await.unwrap().is_none());
        assert!(store.get(SessionKey::AnswersDocument).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let store = InMemorySessionStore::new();
        let other = store.clone();
        other.set(SessionKey::AnswersDocument, "{}").await.unwrap();
        store.remove(SessionKey::UploadedFiles).await.unwrap();
        assert!(store.get(SessionKey::AnswersDocument).await.unwrap().is_some());
    }
}
