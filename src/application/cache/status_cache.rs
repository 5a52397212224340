//! Charger status cache
//!
//! Cache-aside front for the status read path. Every backing-store failure
//! degrades to "miss" or is swallowed after a warning: callers always fall
//! back to the system of record.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::application::chargers::dto::ChargerStatusSnapshot;
use crate::application::ports::CacheStore;

pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct StatusCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl StatusCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `{partner_id}:{charger_id}:status`
    pub fn key(partner_id: i32, charger_id: &str) -> String {
        format!("{}:{}:status", partner_id, charger_id)
    }

    pub async fn get(&self, partner_id: i32, charger_id: &str) -> Option<ChargerStatusSnapshot> {
        let key = Self::key(partner_id, charger_id);
        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                metrics::counter!("charger_status_cache_total", "result" => "miss").increment(1);
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Status cache read failed, treating as miss");
                metrics::counter!("charger_status_cache_total", "result" => "error").increment(1);
                return None;
            }
        };

        match serde_json::from_str::<ChargerStatusSnapshot>(&raw) {
            Ok(snapshot) => {
                debug!(key = %key, "Status cache hit");
                metrics::counter!("charger_status_cache_total", "result" => "hit").increment(1);
                Some(snapshot)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable status cache entry");
                metrics::counter!("charger_status_cache_total", "result" => "error").increment(1);
                None
            }
        }
    }

    pub async fn put(&self, partner_id: i32, snapshot: &ChargerStatusSnapshot) {
        let key = Self::key(partner_id, &snapshot.charger_id);
        let value = match serde_json::to_string(snapshot) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode status snapshot");
                return;
            }
        };

        if let Err(e) = self.store.set(&key, value, self.ttl).await {
            warn!(key = %key, error = %e, "Status cache write failed");
        }
    }

    pub async fn invalidate(&self, partner_id: i32, charger_id: &str) {
        let key = Self::key(partner_id, charger_id);
        match self.store.delete(&key).await {
            Ok(()) => debug!(key = %key, "Status cache entry invalidated"),
            Err(e) => warn!(key = %key, error = %e, "Status cache invalidation failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CacheError;
    use crate::domain::ChargerStatus;
    use crate::infrastructure::cache::InMemoryCacheStore;
    use async_trait::async_trait;
    use chrono::Utc;

    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }
        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }
        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }
    }

    fn snapshot(charger_id: &str) -> ChargerStatusSnapshot {
        ChargerStatusSnapshot {
            charger_id: charger_id.into(),
            status: ChargerStatus::Available,
            name: None,
            location: None,
            configuration: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn key_format() {
        assert_eq!(StatusCache::key(7, "CHARGER_A1"), "7:CHARGER_A1:status");
    }

    #[tokio::test]
    async fn put_get_invalidate() {
        let cache = StatusCache::new(Arc::new(InMemoryCacheStore::new()), DEFAULT_STATUS_TTL);
        let entry = snapshot("C1");
        cache.put(1, &entry).await;

        assert_eq!(cache.get(1, "C1").await, Some(entry));
        assert!(cache.get(2, "C1").await.is_none());

        cache.invalidate(1, "C1").await;
        assert!(cache.get(1, "C1").await.is_none());
    }

    #[tokio::test]
    async fn backend_failures_are_absorbed() {
        let cache = StatusCache::new(Arc::new(BrokenStore), DEFAULT_STATUS_TTL);
        cache.put(1, &snapshot("C1")).await;
        assert!(cache.get(1, "C1").await.is_none());
        cache.invalidate(1, "C1").await;
    }

    #[tokio::test]
    async fn garbage_entry_reads_as_miss() {
        let store = Arc::new(InMemoryCacheStore::new());
        store
            .set("1:C1:status", "not json".into(), DEFAULT_STATUS_TTL)
            .await
            .unwrap();
        let cache = StatusCache::new(store, DEFAULT_STATUS_TTL);
        assert!(cache.get(1, "C1").await.is_none());
    }
}
