//! Crystal API Server
//!
//! Reporting backend for a retail point-of-sale database: sales, customer
//! and inventory reports behind a category dispatcher, plus the legacy
//! login endpoint. Uses hexagonal (ports & adapters) architecture for
//! clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::{ConnectOptions, Database};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod integration_tests;

use adapters::MySqlGateway;
use app::{CustomerReportService, InventoryReportService, Registry, SalesReportService};
use config::Config;
use domain::ports::ReportGateway;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub sales: Arc<SalesReportService<dyn ReportGateway>>,
    pub customers: Arc<CustomerReportService<dyn ReportGateway>>,
    pub inventory: Arc<InventoryReportService<dyn ReportGateway>>,
    pub gateway: Arc<dyn ReportGateway>,
}

impl AppState {
    /// Wire all report services over one shared gateway.
    pub fn new(gateway: Arc<dyn ReportGateway>) -> Self {
        Self {
            sales: Arc::new(SalesReportService::new(gateway.clone())),
            customers: Arc::new(CustomerReportService::new(gateway.clone())),
            inventory: Arc::new(InventoryReportService::new(gateway.clone())),
            gateway,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Report and health routes. The login route is merged in `main` so its
/// rate limiter (which needs peer socket addresses) stays out of tests.
pub fn report_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/reports/sales", post(handlers::sales_report))
        .route("/reports/customers", post(handlers::customers_report))
        .route("/reports/inventory", post(handlers::inventory_report))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crystal_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Crystal API...");

    // Load configuration
    let config = Config::from_env();

    // Force the category registry early so a duplicate registration
    // aborts startup instead of surfacing on the first request.
    let registry = Registry::global();
    tracing::info!(categories = registry.len(), "category registry built");

    // Connect to MySQL
    tracing::info!("Connecting to database...");
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs));
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connected");

    let gateway: Arc<dyn ReportGateway> = Arc::new(MySqlGateway::new(db));
    let state = AppState::new(gateway);

    // Rate limiting for login: 2 req/sec sustained, burst of 5.
    // PeerIpKeyExtractor reads the client IP from the socket connection.
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .expect("Failed to build governor config"),
    );

    let login_routes = Router::new()
        .route("/auth/login", post(handlers::login))
        .layer(GovernorLayer {
            config: governor_config,
        })
        .with_state(state.clone());

    let app = report_router(state)
        .merge(login_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
