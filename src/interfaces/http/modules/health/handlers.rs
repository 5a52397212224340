//! Health check handlers

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::CacheStore;
use crate::domain::RepositoryProvider;

const CACHE_PROBE_KEY: &str = "health_check";

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub cache: Arc<dyn CacheStore>,
    pub started_at: Arc<Instant>,
    pub environment: String,
}

/// Basic liveness answer
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Component health status
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    fn healthy(started: Instant) -> Self {
        Self {
            status: "healthy".to_string(),
            response_time_ms: Some(started.elapsed().as_millis() as u64),
            error: None,
        }
    }

    fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            response_time_ms: None,
            error: Some(error.into()),
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub database: ComponentHealth,
    pub cache: ComponentHealth,
}

/// Detailed health with dependency probes
#[derive(Debug, Serialize, ToSchema)]
pub struct DetailedHealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub environment: String,
    pub uptime_seconds: u64,
    pub services: ServiceHealth,
}

async fn probe_database(repos: &dyn RepositoryProvider) -> ComponentHealth {
    let started = Instant::now();
    match repos.ping().await {
        Ok(()) => ComponentHealth::healthy(started),
        Err(e) => ComponentHealth::unhealthy(e.to_string()),
    }
}

async fn probe_cache(cache: &dyn CacheStore) -> ComponentHealth {
    let started = Instant::now();
    if let Err(e) = cache
        .set(CACHE_PROBE_KEY, "ok".to_string(), Duration::from_secs(10))
        .await
    {
        return ComponentHealth::unhealthy(e.to_string());
    }
    match cache.get(CACHE_PROBE_KEY).await {
        Ok(Some(_)) => ComponentHealth::healthy(started),
        Ok(None) => ComponentHealth::unhealthy("probe value was not readable"),
        Err(e) => ComponentHealth::unhealthy(e.to_string()),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

#[utoipa::path(
    get,
    path = "/health/detailed",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies healthy", body = DetailedHealthResponse),
        (status = 503, description = "A dependency is unhealthy", body = DetailedHealthResponse)
    )
)]
pub async fn detailed_health(
    State(state): State<HealthState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let database = probe_database(state.repos.as_ref()).await;
    let cache = probe_cache(state.cache.as_ref()).await;

    let healthy = database.is_healthy() && cache.is_healthy();
    let (http_status, status) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        http_status,
        Json(DetailedHealthResponse {
            status: status.to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: state.environment.clone(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            services: ServiceHealth { database, cache },
        }),
    )
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to serve traffic", body = HealthResponse),
        (status = 503, description = "A dependency is unreachable", body = HealthResponse)
    )
)]
pub async fn readiness(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = probe_database(state.repos.as_ref()).await;
    let cache = probe_cache(state.cache.as_ref()).await;
    let (code, status) = if database.is_healthy() && cache.is_healthy() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };
    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            timestamp: Utc::now(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses((status = 200, description = "Process is alive", body = HealthResponse))
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::application::CacheError;
    use crate::infrastructure::{InMemoryCacheStore, InMemoryRepositoryProvider};

    struct DownCache;

    #[async_trait]
    impl CacheStore for DownCache {
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

    fn state(cache: Arc<dyn CacheStore>) -> HealthState {
        HealthState {
            repos: Arc::new(InMemoryRepositoryProvider::new()),
            cache,
            started_at: Arc::new(Instant::now()),
            environment: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn detailed_health_reports_both_dependencies() {
        let (code, Json(body)) =
            detailed_health(State(state(Arc::new(InMemoryCacheStore::new())))).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "healthy");
        assert!(body.services.database.is_healthy());
        assert!(body.services.cache.is_healthy());
        assert_eq!(body.environment, "test");
    }

    #[tokio::test]
    async fn broken_cache_makes_service_unavailable() {
        let (code, Json(body)) = detailed_health(State(state(Arc::new(DownCache)))).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.services.cache.status, "unhealthy");
        assert!(body.services.cache.error.is_some());
    }

    #[tokio::test]
    async fn readiness_follows_dependency_health() {
        let (code, Json(body)) =
            readiness(State(state(Arc::new(InMemoryCacheStore::new())))).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ready");

        let (code, Json(body)) = readiness(State(state(Arc::new(DownCache)))).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "not_ready");
    }
}
