//! In-process signature store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheError, CachedAuthorization, SignatureStore};

/// Signature store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySignatureStore {
    entries: RwLock<HashMap<String, CachedAuthorization>>,
}

impl MemorySignatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, valid or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SignatureStore for MemorySignatureStore {
    async fn get(&self, key: &str) -> Result<Option<CachedAuthorization>, CacheError> {
        Ok(self.entries.read().await.get(key).filter(|entry| entry.is_valid()).cloned())
    }

    async fn put(&self, entry: &CachedAuthorization) -> Result<(), CacheError> {
        self.entries.write().await.insert(entry.key.clone(), entry.clone());
        Ok(())
    }
}
