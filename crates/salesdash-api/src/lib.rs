//! HTTP API server for the sales dashboard
//!
//! Routes are organized into modules:
//! - routes::seed: Reseed the store from the feed
//! - routes::transactions: Paginated, searchable listing
//! - routes::charts: Statistics, price histogram, category counts
//! - routes::combined: Every widget for one month at once
//!
//! All dashboard routes live under `server.base_path`; `/api/health` is fixed.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};
use log::{error, info};
use salesdash_config::Config;
use salesdash_core::{CoreResult, FeedSource, HttpFeed, QueryService, ReplaceMode, SeedLoader, StoreRef};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueryService>,
    pub seeder: Arc<SeedLoader>,
    pub config: Config,
}

impl AppState {
    /// State over an explicit feed source
    pub fn new(config: Config, store: StoreRef, feed: Arc<dyn FeedSource>) -> Self {
        let service = QueryService::from_config(&config, store.clone());
        let mode = ReplaceMode::from_atomic(config.seed.atomic);
        let seeder = SeedLoader::new(feed, store, mode);
        Self {
            service: Arc::new(service),
            seeder: Arc::new(seeder),
            config,
        }
    }

    /// State seeding from the configured HTTP feed
    pub fn from_config(config: Config, store: StoreRef) -> CoreResult<Self> {
        let feed = HttpFeed::new(&config.feed)?;
        Ok(Self::new(config, store, Arc::new(feed)))
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::charts::{api_bar_chart, api_categories_count, api_statistics};
    use routes::combined::api_combined;
    use routes::seed::api_initialize_database;
    use routes::transactions::api_all_transactions;

    let dashboard = Router::new()
        .route("/initializeDatabase", get(api_initialize_database))
        .route("/getAllTransactions", get(api_all_transactions))
        .route("/getStatistics", get(api_statistics))
        .route("/getBarChartData", get(api_bar_chart))
        .route("/getCategoriesCount", get(api_categories_count))
        .route("/combined", get(api_combined));

    let base_path = state.config.server.base_path.trim_end_matches('/').to_string();
    let router = Router::new().route("/api/health", get(health_check));
    let router = if base_path.is_empty() {
        router.merge(dashboard)
    } else {
        router.nest(&base_path, dashboard)
    };

    router.layer(CorsLayer::permissive()).with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Start the HTTP server and run until Ctrl+C or SIGTERM
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.bind_address();
    let base_path = state.config.server.base_path.clone();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Starting sales dashboard server on http://{}", listener.local_addr()?);
    info!("Available routes:");
    info!("  - /api/health");
    for route in [
        "initializeDatabase",
        "getAllTransactions",
        "getStatistics",
        "getBarChartData",
        "getCategoriesCount",
        "combined",
    ] {
        info!("  - {}/{}", base_path, route);
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ==================== Tests ====================
