//! Core types and shared functionality for seo-mcp.
//!
//! This crate provides:
//! - Signature cache with a JSON file backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheError, CachedAuthorization, FileSignatureStore, MemorySignatureStore, SignatureStore};
pub use config::{AppConfig, ConfigError, Transport};
pub use error::Error;
