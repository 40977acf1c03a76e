use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_user_auth, trace_id};
use crate::routes::{assets, auth, dashboard, employees, health, orders, requests, users};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Result<Self, JwtError> {
        let jwt = JwtConfig::from_rsa_pem(
            &config.jwt.private_key,
            &config.jwt.public_key,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;

        Ok(Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        })
    }
}

/// Builds the router. Fails when the configured signing keys are unusable.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let state = AppState::new(config, pool)?;
    Ok(router(state))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/login", post(auth::login));

    let protected_routes = Router::new()
        // Session
        .route("/api/v1/auth/session", get(auth::session))
        .route("/api/v1/auth/me", patch(auth::update_me))
        .route("/api/v1/auth/logout", post(auth::logout))
        // Assets
        .route(
            "/api/v1/assets",
            get(assets::list_assets).post(assets::create_asset),
        )
        .route("/api/v1/assets/options/:field", get(assets::filter_options))
        .route("/api/v1/assets/audit", get(assets::audit_assets))
        .route(
            "/api/v1/assets/audit/options/:field",
            get(assets::audit_filter_options),
        )
        .route("/api/v1/assets/export", get(assets::export_assets))
        .route("/api/v1/assets/template", get(assets::asset_template))
        .route("/api/v1/assets/import", post(assets::import_assets))
        .route(
            "/api/v1/assets/:id",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/api/v1/assets/:id/assign", post(assets::assign_asset))
        .route("/api/v1/assets/:id/return", post(assets::return_asset))
        .route(
            "/api/v1/assets/:id/status-options",
            get(assets::status_options),
        )
        .route("/api/v1/assets/:id/status", post(assets::change_status))
        .route("/api/v1/assets/:id/location", post(assets::change_location))
        .route("/api/v1/assets/:id/asset-check", post(assets::set_asset_check))
        .route("/api/v1/assets/:id/history", get(assets::asset_history))
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        // Orders and stock
        .route(
            "/api/v1/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route("/api/v1/orders/import", post(orders::import_orders))
        .route("/api/v1/orders/template", get(orders::order_template))
        .route(
            "/api/v1/orders/:id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/api/v1/orders/:id/history", get(orders::order_history))
        .route("/api/v1/stock", get(orders::stock))
        .route("/api/v1/stock/employees", get(orders::employee_stock))
        .route("/api/v1/devices", get(orders::list_devices))
        // Pending requests
        .route("/api/v1/requests", get(requests::list_requests))
        .route(
            "/api/v1/requests/:id/approve",
            post(requests::approve_request),
        )
        .route("/api/v1/requests/:id/reject", post(requests::reject_request))
        .route("/api/v1/requests/:id/cancel", post(requests::cancel_request))
        // Employees
        .route(
            "/api/v1/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route("/api/v1/employees/export", get(employees::export_employees))
        .route(
            "/api/v1/employees/template",
            get(employees::employee_template),
        )
        .route("/api/v1/employees/import", post(employees::import_employees))
        .route(
            "/api/v1/employees/:id",
            put(employees::update_employee).delete(employees::delete_employee),
        )
        // Users
        .route(
            "/api/v1/users",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/api/v1/users/:id",
            put(users::update_user).delete(users::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config.security.cors_origins))
        .with_state(state)
}
