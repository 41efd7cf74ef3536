//! JSON-document signature store.
//!
//! The document is a flat object keyed by domain:
//!
//! ```json
//! { "example.com": { "signature": "...", "valid_until": "...", "overview_data": {}, "timestamp": "..." } }
//! ```
//!
//! Every `get` reads the whole file and every `put` rewrites it. Nothing is
//! kept in memory between calls, so after a failed `put` the new entry is
//! gone and later reads see only what is on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::{CacheError, CachedAuthorization, SignatureStore, StoredEntry, hash::fingerprint};

/// Signature store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileSignatureStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSignatureStore {
    /// Create a store backed by `path`. The file is created on first `put`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full document. A missing or empty file is an empty map.
    async fn load_document(&self) -> Result<Map<String, Value>, CacheError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| CacheError::Serialization(format!("failed to parse {}: {e}", self.path.display())))
    }

    async fn persist_document(&self, document: &Map<String, Value>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| CacheError::Io {
                path: parent.display().to_string(),
                message: e.to_string(),
            })?;
        }

        let serialized = serde_json::to_vec_pretty(document)
            .map_err(|e| CacheError::Serialization(format!("failed to serialize cache document: {e}")))?;

        let mut tmp_path = self.path.clone();
        tmp_path.set_extension("json.tmp");

        tokio::fs::write(&tmp_path, &serialized).await.map_err(|e| CacheError::Io {
            path: tmp_path.display().to_string(),
            message: e.to_string(),
        })?;

        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| self.io_error(e))
    }

    fn io_error(&self, err: std::io::Error) -> CacheError {
        CacheError::Io { path: self.path.display().to_string(), message: err.to_string() }
    }
}

#[async_trait]
impl SignatureStore for FileSignatureStore {
    async fn get(&self, key: &str) -> Result<Option<CachedAuthorization>, CacheError> {
        let mut document = self.load_document().await?;

        let Some(raw) = document.remove(key) else {
            tracing::debug!(domain = key, "signature cache miss");
            return Ok(None);
        };

        let entry = match serde_json::from_value::<StoredEntry>(raw) {
            Ok(stored) => CachedAuthorization::from_stored(key, stored),
            Err(e) => {
                tracing::warn!(domain = key, error = %e, "ignoring undecodable signature cache entry");
                None
            }
        };

        match entry {
            Some(entry) if entry.is_valid() => {
                tracing::debug!(
                    domain = key,
                    signature = %fingerprint(&entry.signature),
                    valid_until = %entry.valid_until,
                    "signature cache hit"
                );
                Ok(Some(entry))
            }
            _ => {
                tracing::debug!(domain = key, "signature cache entry expired");
                Ok(None)
            }
        }
    }

    async fn put(&self, entry: &CachedAuthorization) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;

        let mut document = match self.load_document().await {
            Ok(document) => document,
            Err(CacheError::Serialization(msg)) => {
                tracing::warn!(path = %self.path.display(), "rewriting corrupt signature cache: {}", msg);
                Map::new()
            }
            Err(e) => return Err(e),
        };

        let stored = serde_json::to_value(entry.to_stored())
            .map_err(|e| CacheError::Serialization(format!("failed to serialize entry: {e}")))?;
        document.insert(entry.key.clone(), stored);

        self.persist_document(&document).await?;

        tracing::debug!(
            domain = %entry.key,
            signature = %fingerprint(&entry.signature),
            entries = document.len(),
            "signature cached"
        );

        Ok(())
    }
}
