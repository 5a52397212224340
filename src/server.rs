//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: database and migrations,
//! bootstrap data, services, the REST API listener and graceful shutdown.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::{
    AdminAuthService, CacheStore, ChargerControlService, DeviceControlPort, PartnerService,
    StatusCache,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::seed::seed_demo_data;
use crate::infrastructure::{
    init_database, run_migrations, InMemoryCacheStore, SeaOrmRepositoryProvider,
    SimulatedDeviceController,
};
use crate::interfaces::http::router::{create_api_router, ApiServices};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true)
    pub auto_migrate: bool,
    /// Create the configured admin when none exists (default: true)
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

/// The global recorder can only be installed once per process.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = HANDLE.get() {
        return Some(handle.clone());
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics recorder installed");
            Some(HANDLE.get_or_init(|| handle).clone())
        }
        Err(e) => {
            warn!("Metrics recorder unavailable, /metrics disabled: {}", e);
            None
        }
    }
}

/// Handle to a running gateway.
///
/// ```rust,no_run
/// use charger_gateway::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Port actually bound, useful when configured as 0
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        info!(environment = %app_cfg.environment.name, "Starting charger gateway...");

        let metrics = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db_config = app_cfg.database_config();
        info!("Database: {}", db_config.url);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            run_migrations(&db).await?;
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        // ── Services ───────────────────────────────────────────
        let jwt_config = app_cfg.jwt_config();
        info!(
            access_minutes = jwt_config.access_token_minutes,
            refresh_minutes = jwt_config.refresh_token_minutes,
            "JWT configured"
        );
        let admin = Arc::new(AdminAuthService::new(repos.clone(), jwt_config));

        if opts.create_default_admin {
            let cfg = &app_cfg.admin;
            if let Err(e) = admin
                .ensure_default_admin(&cfg.username, &cfg.password, &cfg.role)
                .await
            {
                error!("Failed to create default admin: {}", e);
            }
        }

        if app_cfg.seed.demo_data {
            match seed_demo_data(repos.as_ref()).await {
                Ok(true) => info!("Demo partners and chargers inserted"),
                Ok(false) => info!("Partners already present, demo data skipped"),
                Err(e) => error!("Failed to seed demo data: {}", e),
            }
        }

        let cache: Arc<dyn CacheStore> =
            Arc::new(InMemoryCacheStore::with_capacity(app_cfg.cache.max_entries));
        let status_cache = StatusCache::new(
            cache.clone(),
            Duration::from_secs(app_cfg.cache.status_ttl_secs),
        );

        let device: Arc<dyn DeviceControlPort> = Arc::new(SimulatedDeviceController::new(
            Duration::from_millis(app_cfg.device.latency_ms),
            app_cfg.device.success_rate,
        ));

        let chargers = Arc::new(ChargerControlService::new(
            repos.clone(),
            status_cache,
            device,
        ));
        let partners = Arc::new(PartnerService::new(repos.clone()));

        info!(
            requests_per_second = app_cfg.rate_limit.requests_per_second,
            burst_size = app_cfg.rate_limit.burst_size,
            "Rate limit settings loaded (not enforced)"
        );

        // ── REST API server ────────────────────────────────────
        let router = create_api_router(ApiServices {
            repos: repos.clone(),
            cache,
            chargers,
            partners,
            admin,
            environment: app_cfg.environment.name.clone(),
            metrics,
        });

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);

        let listener = tokio::net::TcpListener::bind(app_cfg.listen_address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            api_port: local_addr.port(),
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Waits for the API task to drain, bounded by the shutdown timeout,
    /// then closes the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let drained = shutdown
            .shutdown_with_cleanup(move || async move {
                if let Err(e) = api_task.await {
                    error!("REST API server task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("In-flight requests were abandoned");
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }
        info!("Charger gateway shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("Shutting down charger gateway...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing from the application config. `RUST_LOG` wins over
/// the configured level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}
