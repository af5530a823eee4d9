//! Cache effect interface for session-scoped state
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `storefront-effects`
//! - **Usage**: page-state persistence, scratch-message ledger, prompt state
//!
//! Each key is independent. There is no compare-and-swap and no transaction
//! spanning several keys.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for cache operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum CacheError {
    #[error("Invalid cache key: {reason}")]
    InvalidKey { reason: String },
    #[error("Cache unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Pure trait for key/value cache operations
#[async_trait]
pub trait CacheEffects: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;

    /// Remove `key`; returns whether a value was present
    async fn remove(&self, key: &str) -> Result<bool, CacheError>;
}
