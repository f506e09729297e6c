use crate::constants::{
    DAILY_CHART_LOOKBACK_DAYS, FNO_STOCKS, NIFTY_50_STOCKS, NIFTY_NEXT_50_STOCKS,
    SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT,
};
use crate::error::Error;
use crate::models::{DirectoryEntry, WatchlistEntry};
use crate::server::AppState;
use crate::services::{all_averages, daily_series, fetch_watchlist, normalize};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Map a pipeline error to the HTTP surface: bad input is the caller's
/// fault, a missing series is not found, anything else is the upstream
/// provider misbehaving.
fn error_response(err: Error) -> Response {
    let status = match &err {
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::NoData(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

/// GET /api/search?q=REL&limit=10
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<DirectoryEntry>> {
    let limit = params
        .limit
        .unwrap_or(SEARCH_DEFAULT_LIMIT)
        .min(SEARCH_MAX_LIMIT);

    if params.q.trim().is_empty() {
        return Json(Vec::new());
    }

    let hits = state.directory.lookup(&params.q, limit).await;
    debug!(q = %params.q, hits = hits.len(), "Directory search");
    Json(hits)
}

#[derive(Debug, Deserialize)]
pub struct TickerQuery {
    pub ticker: Option<String>,
}

/// GET /api/stock-details?ticker=RELIANCE
pub async fn stock_details_handler(
    State(state): State<AppState>,
    Query(params): Query<TickerQuery>,
) -> Response {
    let Some(ticker) = params.ticker.filter(|t| !t.trim().is_empty()) else {
        return error_response(Error::InvalidInput("Missing ticker parameter".to_string()));
    };

    info!(ticker = %ticker, "Stock details request");
    match all_averages(state.market.as_ref(), &ticker).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct DailySeriesQuery {
    pub ticker: Option<String>,
    pub period: Option<String>,
}

fn period_to_days(period: &str) -> Option<i64> {
    match period {
        "1mo" => Some(30),
        "3mo" => Some(91),
        "6mo" => Some(182),
        "1y" => Some(DAILY_CHART_LOOKBACK_DAYS),
        "2y" => Some(2 * DAILY_CHART_LOOKBACK_DAYS),
        _ => None,
    }
}

/// GET /api/daily-series?ticker=RELIANCE&period=1y
pub async fn daily_series_handler(
    State(state): State<AppState>,
    Query(params): Query<DailySeriesQuery>,
) -> Response {
    let Some(ticker) = params.ticker.filter(|t| !t.trim().is_empty()) else {
        return error_response(Error::InvalidInput("Missing ticker parameter".to_string()));
    };

    let period = params.period.as_deref().unwrap_or("1y");
    let Some(lookback_days) = period_to_days(period) else {
        return error_response(Error::InvalidInput(format!("Unknown period: {}", period)));
    };

    let canonical = normalize(state.market.as_ref(), &ticker).await;
    match daily_series(state.market.as_ref(), &canonical, lookback_days).await {
        Ok(series) => Json(series).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct WatchlistQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub stocks: Vec<WatchlistEntry>,
}

async fn watchlist_response(
    state: &AppState,
    symbols: &[&str],
    query: Option<&str>,
) -> Json<WatchlistResponse> {
    let stocks = fetch_watchlist(state.market.as_ref(), symbols, query).await;
    Json(WatchlistResponse { stocks })
}

/// GET /api/fno-stocks?q=REL
pub async fn fno_stocks_handler(
    State(state): State<AppState>,
    Query(params): Query<WatchlistQuery>,
) -> Json<WatchlistResponse> {
    watchlist_response(&state, FNO_STOCKS, params.q.as_deref()).await
}

/// GET /api/nifty-stocks?q=REL
pub async fn nifty_stocks_handler(
    State(state): State<AppState>,
    Query(params): Query<WatchlistQuery>,
) -> Json<WatchlistResponse> {
    watchlist_response(&state, NIFTY_50_STOCKS, params.q.as_deref()).await
}

/// GET /api/nifty-next-50-stocks?q=REL
pub async fn nifty_next_50_stocks_handler(
    State(state): State<AppState>,
    Query(params): Query<WatchlistQuery>,
) -> Json<WatchlistResponse> {
    watchlist_response(&state, NIFTY_NEXT_50_STOCKS, params.q.as_deref()).await
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
