pub mod api;
pub mod pages;

use crate::services::{DirectoryCache, MarketDataSource};
use axum::{
    extract::FromRef,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

/// Shared market-data client handle
pub type SharedMarketData = Arc<dyn MarketDataSource>;

/// Shared directory cache handle
pub type SharedDirectory = Arc<DirectoryCache>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub market: SharedMarketData,
    pub directory: SharedDirectory,
    pub started_at: Instant,
}

impl FromRef<AppState> for SharedMarketData {
    fn from_ref(app_state: &AppState) -> SharedMarketData {
        app_state.market.clone()
    }
}

impl FromRef<AppState> for SharedDirectory {
    fn from_ref(app_state: &AppState) -> SharedDirectory {
        app_state.directory.clone()
    }
}

/// Start the axum server
pub async fn serve(
    market: SharedMarketData,
    directory: SharedDirectory,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting nse200 server");

    let app_state = AppState {
        market,
        directory,
        started_at: Instant::now(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    tracing::info!("Registering routes:");
    tracing::info!("  GET/POST /            (single-ticker lookup page)");
    tracing::info!("  GET /fno /nifty50 /nifty-next-50 /stocks");
    tracing::info!("  GET /api/search?q=REL&limit=10");
    tracing::info!("  GET /api/stock-details?ticker=RELIANCE");
    tracing::info!("  GET /api/daily-series?ticker=RELIANCE.NS&period=1y");
    tracing::info!("  GET /api/fno-stocks /api/nifty-stocks /api/nifty-next-50-stocks");
    tracing::info!("  GET /health");

    let app = Router::new()
        .route("/", get(pages::home_page).post(pages::home_submit))
        .route("/fno", get(pages::fno_page))
        .route("/nifty50", get(pages::nifty50_page))
        .route("/nifty-next-50", get(pages::nifty_next_50_page))
        .route("/stocks", get(pages::stocks_page))
        .route("/health", get(api::health_handler))
        .route("/api/search", get(api::search_handler))
        .route("/api/stock-details", get(api::stock_details_handler))
        .route("/api/daily-series", get(api::daily_series_handler))
        .route("/api/fno-stocks", get(api::fno_stocks_handler))
        .route("/api/nifty-stocks", get(api::nifty_stocks_handler))
        .route("/api/nifty-next-50-stocks", get(api::nifty_next_50_stocks_handler))
        .layer(cors)
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
