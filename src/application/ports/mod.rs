//! Outbound ports
//!
//! Contracts for the collaborators the application layer talks to but does
//! not own: the status cache backing store and the charger device link.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::application::chargers::dto::ControlRequest;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key/value store with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Link to the physical charger.
///
/// Unreliable and non-transactional: the answer is a plain yes/no.
#[async_trait]
pub trait DeviceControlPort: Send + Sync {
    async fn send(&self, request: &ControlRequest) -> bool;
}
