//! Expiring cache for upstream signed authorizations.
//!
//! One entry per query domain. An entry is only handed back while
//! `now < valid_until`; expired, undecodable and missing entries all read as
//! `None`, so callers cannot tell "never cached" from "expired".
//!
//! - `FileSignatureStore` keeps the whole map in one JSON document that is
//!   re-read on every access and rewritten on every `put`.
//! - `MemorySignatureStore` is the in-process equivalent used by tests.
//!
//! There is no cross-process locking. Two processes refreshing at once may
//! lose one write; the loser simply re-acquires on its next call.

pub mod entry;
pub mod file;
pub mod hash;
pub mod memory;

pub use entry::{CachedAuthorization, StoredEntry, parse_instant};
pub use file::FileSignatureStore;
pub use memory::MemorySignatureStore;

use async_trait::async_trait;

/// Errors from reading or persisting the signature cache.
///
/// Never fatal to a tool call: callers log these and carry on.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem access failed.
    #[error("cache io error on {path}: {message}")]
    Io { path: String, message: String },

    /// The cache document could not be encoded or decoded.
    #[error("cache serialization error: {0}")]
    Serialization(String),
}

/// Storage contract for cached authorizations, keyed by domain.
#[async_trait]
pub trait SignatureStore: Send + Sync {
    /// Return the entry for `key` if it is still valid.
    async fn get(&self, key: &str) -> Result<Option<CachedAuthorization>, CacheError>;

    /// Insert or replace the entry for `entry.key` and persist the map.
    async fn put(&self, entry: &CachedAuthorization) -> Result<(), CacheError>;
}
