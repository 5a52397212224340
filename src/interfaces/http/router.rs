//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, PaginatedResponse};
use super::middleware::{auth_middleware, AuthState};
use super::modules::{admin, chargers, health, metrics, partners, request_id};
use crate::application::{
    AdminAuthService, ApiKeyStrategy, AuthorizationResolver, CacheStore, ChargerControlService,
    ChargerStatusSnapshot, ControlOutcome, PartnerService, TokenStrategy,
};
use crate::domain::{
    ChargerAction, ChargerConfiguration, ChargerStatus, Location, PartnerSettings,
    PartnerStatistics, PartnerStatus, RepositoryProvider,
};

/// Everything the HTTP layer needs, built once at startup.
#[derive(Clone)]
pub struct ApiServices {
    pub repos: Arc<dyn RepositoryProvider>,
    pub cache: Arc<dyn CacheStore>,
    pub chargers: Arc<ChargerControlService>,
    pub partners: Arc<PartnerService>,
    pub admin: Arc<AdminAuthService>,
    pub environment: String,
    /// `/metrics` is only mounted when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Administrator access token"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        health::detailed_health,
        health::readiness,
        health::liveness,
        // Admin
        admin::login,
        admin::refresh,
        // Chargers
        chargers::get_charger_status,
        chargers::update_charger_status,
        chargers::control_charger,
        chargers::get_batch_status,
        // Partners
        partners::create_partner,
        partners::list_partners,
        partners::partner_statistics,
        partners::get_partner,
        partners::update_partner,
        partners::delete_partner,
        partners::change_partner_status,
        partners::rotate_partner_key,
        partners::partner_charger_count,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<partners::PartnerDto>,
            // Health
            health::HealthResponse,
            health::DetailedHealthResponse,
            health::ServiceHealth,
            health::ComponentHealth,
            // Admin
            admin::LoginRequest,
            admin::RefreshRequest,
            admin::TokenResponse,
            // Chargers
            ChargerStatus,
            ChargerAction,
            Location,
            ChargerConfiguration,
            ChargerStatusSnapshot,
            ControlOutcome,
            chargers::UpdateStatusRequest,
            chargers::ControlChargerRequest,
            chargers::BatchStatusResponse,
            // Partners
            PartnerStatus,
            PartnerSettings,
            PartnerStatistics,
            partners::PartnerDto,
            partners::CreatePartnerRequest,
            partners::UpdatePartnerRequest,
            partners::ChangeStatusRequest,
            partners::ChargerCountResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness, readiness and dependency probes"),
        (name = "Admin", description = "Administrator login and token refresh"),
        (name = "Chargers", description = "Charger status and remote control, by partner API key or admin token"),
        (name = "Partners", description = "Partner management, admin token only"),
    ),
    info(
        title = "Charger Gateway API",
        version = "0.1.0",
        description = "Partner-facing remote control and status API for EV chargers",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(services: ApiServices) -> Router {
    let jwt_config = services.admin.jwt_config().clone();

    // API key first, then admin token
    let partner_or_admin = AuthState {
        resolver: AuthorizationResolver::new()
            .with_strategy(Arc::new(ApiKeyStrategy::new(services.repos.clone())))
            .with_strategy(Arc::new(TokenStrategy::new(jwt_config.clone()))),
        partners: services.partners.clone(),
    };
    let admin_only = AuthState {
        resolver: AuthorizationResolver::new()
            .with_strategy(Arc::new(TokenStrategy::new(jwt_config))),
        partners: services.partners.clone(),
    };
    debug!(
        chargers = ?partner_or_admin.resolver.strategy_names(),
        partners = ?admin_only.resolver.strategy_names(),
        "Authorization strategies"
    );

    let charger_routes = Router::new()
        .route("/batch/status", get(chargers::get_batch_status))
        .route(
            "/{charger_id}/status",
            get(chargers::get_charger_status).put(chargers::update_charger_status),
        )
        .route("/{charger_id}/control", post(chargers::control_charger))
        .layer(middleware::from_fn_with_state(
            partner_or_admin,
            auth_middleware,
        ))
        .with_state(chargers::ChargerState {
            chargers: services.chargers.clone(),
        });

    let partner_routes = Router::new()
        .route(
            "/",
            get(partners::list_partners).post(partners::create_partner),
        )
        .route("/statistics", get(partners::partner_statistics))
        .route(
            "/{id}",
            get(partners::get_partner)
                .put(partners::update_partner)
                .delete(partners::delete_partner),
        )
        .route("/{id}/status", patch(partners::change_partner_status))
        .route("/{id}/rotate-key", post(partners::rotate_partner_key))
        .route("/{id}/chargers/count", get(partners::partner_charger_count))
        .layer(middleware::from_fn_with_state(admin_only, auth_middleware))
        .with_state(partners::PartnerState {
            partners: services.partners.clone(),
        });

    // Admin routes (public)
    let admin_routes = Router::new()
        .route("/login", post(admin::login))
        .route("/refresh", post(admin::refresh))
        .with_state(admin::AdminState {
            admin: services.admin.clone(),
        });

    let health_routes = Router::new()
        .route("/", get(health::health_check))
        .route("/detailed", get(health::detailed_health))
        .route("/ready", get(health::readiness))
        .route("/live", get(health::liveness))
        .with_state(health::HealthState {
            repos: services.repos.clone(),
            cache: services.cache.clone(),
            started_at: Arc::new(Instant::now()),
            environment: services.environment.clone(),
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .nest("/health", health_routes)
        .nest("/api/v1/admin", admin_routes)
        .nest("/api/v1/auth/partners", partner_routes)
        .nest("/api/v1/chargers", charger_routes);

    if let Some(handle) = services.metrics {
        router = router.route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
}
