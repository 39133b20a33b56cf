//! Document persistence boundary
//!
//! The session only ever talks to a [`DocumentStore`]; whether that is a
//! REST backend, the local filesystem, or an in-memory map is invisible to
//! it. Saving ships the raw document bytes plus [`DocumentMeta`]; loading
//! returns the bytes and the stored display name.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata accompanying every saved document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Store id of the document
    pub id: String,
    /// Display name (the session title)
    pub name: String,
    /// Key identifying the owning user
    pub owner_key: String,
}

/// Failures at the persistence boundary.
///
/// Every variant is retryable from the session's point of view: the
/// document stays dirty and the next qualifying edit or manual save
/// re-attempts.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("document {id} not found")]
    NotFound { id: String },

    #[error("store rejected the document (status {status})")]
    Rejected { status: u16 },

    #[error("metadata for {id} could not be read or written")]
    Metadata {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where documents are persisted.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a document snapshot. Any error is surfaced to the user and
    /// leaves the session dirty.
    async fn save(&self, document: &[u8], meta: &DocumentMeta) -> Result<(), StoreError>;

    /// Fetch a document and its display name by id.
    async fn load(&self, id: &str) -> Result<(Vec<u8>, String), StoreError>;
}

// ===== In-memory store =====

#[derive(Debug, Default)]
struct MemoryStoreInner {
    documents: HashMap<String, (Vec<u8>, String)>,
    save_count: u64,
    failing: bool,
}

/// Map-backed store.
///
/// Counts saves and can be switched into a failing mode, which makes it the
/// store of choice for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a document, as if it had been saved earlier.
    pub fn with_document(self, id: impl Into<String>, document: &[u8], name: &str) -> Self {
        {
            let mut inner = self.inner.lock().expect("memory store lock");
            inner
                .documents
                .insert(id.into(), (document.to_vec(), name.to_string()));
        }
        self
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> u64 {
        self.inner.lock().expect("memory store lock").save_count
    }

    /// Make every subsequent save fail with a rejected status.
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().expect("memory store lock").failing = failing;
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn save(&self, document: &[u8], meta: &DocumentMeta) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store lock");
        if inner.failing {
            return Err(StoreError::Rejected { status: 500 });
        }
        inner
            .documents
            .insert(meta.id.clone(), (document.to_vec(), meta.name.clone()));
        inner.save_count += 1;
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<(Vec<u8>, String), StoreError> {
        let inner = self.inner.lock().expect("memory store lock");
        inner
            .documents
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}

// ===== Directory-backed store =====

/// Stores each document as `<id>.md` with a `<id>.json` metadata sidecar.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn body_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.md"))
    }

    fn meta_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn save(&self, document: &[u8], meta: &DocumentMeta) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.body_path(&meta.id), document).await?;

        let sidecar = serde_json::to_vec_pretty(meta).map_err(|source| StoreError::Metadata {
            id: meta.id.clone(),
            source,
        })?;
        tokio::fs::write(self.meta_path(&meta.id), sidecar).await?;
        tracing::debug!(id = %meta.id, bytes = document.len(), "document written");
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<(Vec<u8>, String), StoreError> {
        let document = match tokio::fs::read(self.body_path(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound { id: id.to_string() });
            }
            Err(e) => return Err(e.into()),
        };

        let meta: DocumentMeta = match tokio::fs::read(self.meta_path(id)).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| StoreError::Metadata {
                    id: id.to_string(),
                    source,
                })?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound { id: id.to_string() });
            }
            Err(e) => return Err(e.into()),
        };

        Ok((document, meta.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str, name: &str) -> DocumentMeta {
        DocumentMeta {
            id: id.to_string(),
            name: name.to_string(),
            owner_key: "user-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.save(b"hello", &meta("doc", "notes")).await.unwrap();

        let (bytes, name) = store.load("doc").await.unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(name, "notes");
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_failure_mode() {
        let store = MemoryStore::new();
        store.set_failing(true);
        let err = store.save(b"x", &meta("doc", "notes")).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected { status: 500 }));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_memory_store_missing_document() {
        let store = MemoryStore::new();
        let err = store.load("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store
            .save(b"# Title\n\nbody", &meta("abc123", "My Notes"))
            .await
            .unwrap();

        let (bytes, name) = store.load("abc123").await.unwrap();
        assert_eq!(bytes, b"# Title\n\nbody");
        assert_eq!(name, "My Notes");
    }

    #[tokio::test]
    async fn test_file_store_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let err = store.load("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_file_store_corrupt_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.save(b"body", &meta("doc", "notes")).await.unwrap();

        tokio::fs::write(dir.path().join("doc.json"), b"not json")
            .await
            .unwrap();
        let err = store.load("doc").await.unwrap_err();
        assert!(matches!(err, StoreError::Metadata { .. }));
    }
}
