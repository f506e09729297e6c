//! Watch-list batch fetching.
//!
//! Runs the per-symbol price/average pipeline across a fixed symbol list
//! under a bounded pool. Every symbol yields exactly one entry; upstream
//! faults are downgraded at the symbol boundary and never abort siblings.

use crate::constants::{
    LATEST_PRICE_LOOKBACK_DAYS, NSE_SUFFIX, WATCHLIST_CONCURRENCY, WEEKLY_FETCH_WEEKS,
};
use crate::models::{Interval, WatchlistEntry};
use crate::services::averages::weekly_average_200;
use crate::services::yahoo::MarketDataSource;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Fetch one entry per watch-list symbol, optionally filtered to symbols
/// starting with `query` (case-insensitive). Entries come back in completion
/// order; callers needing a stable order sort by symbol afterwards.
pub async fn fetch_watchlist<S: MarketDataSource + ?Sized>(
    source: &S,
    symbols: &[&str],
    query: Option<&str>,
) -> Vec<WatchlistEntry> {
    let needle = query.map(|q| q.trim().to_uppercase()).unwrap_or_default();
    let filtered: Vec<&str> = if needle.is_empty() {
        symbols.to_vec()
    } else {
        symbols
            .iter()
            .copied()
            .filter(|s| s.to_uppercase().starts_with(&needle))
            .collect()
    };

    info!(
        total = symbols.len(),
        filtered = filtered.len(),
        "Fetching watch-list batch"
    );

    let semaphore = Arc::new(Semaphore::new(WATCHLIST_CONCURRENCY));
    let mut in_flight = FuturesUnordered::new();
    for symbol in &filtered {
        let semaphore = semaphore.clone();
        in_flight.push(async move {
            let _permit = semaphore
                .acquire()
                .await
                .expect("watch-list semaphore closed");
            fetch_one(source, symbol).await
        });
    }

    let mut entries = Vec::with_capacity(filtered.len());
    while let Some(entry) = in_flight.next().await {
        entries.push(entry);
    }
    entries
}

/// One symbol's pipeline: latest price from a short daily window, then the
/// 200-week average. Watch-list symbols are NSE-listed, so the `.NS` suffix
/// is applied directly without resolution probes. A missing price is
/// `no_data`, a fault is `error`; a missing or failed long average leaves
/// the price entry intact.
async fn fetch_one<S: MarketDataSource + ?Sized>(source: &S, symbol: &str) -> WatchlistEntry {
    let suffixed = format!("{}{}", symbol, NSE_SUFFIX);

    let price = match source
        .fetch_series(&suffixed, Interval::Daily, LATEST_PRICE_LOOKBACK_DAYS)
        .await
    {
        Ok(outcome) => outcome
            .into_points()
            .and_then(|points| points.last().map(|p| p.close)),
        Err(e) => {
            warn!(symbol = symbol, error = %e, "Watch-list price fetch failed");
            return WatchlistEntry::error(symbol, e.to_string());
        }
    };

    let Some(price) = price else {
        return WatchlistEntry::no_data(symbol);
    };

    let avg_200w = match source
        .fetch_series(&suffixed, Interval::Weekly, WEEKLY_FETCH_WEEKS * 7)
        .await
    {
        Ok(outcome) => outcome
            .into_points()
            .and_then(|points| weekly_average_200(&points).avg_200_week),
        Err(e) => {
            debug!(symbol = symbol, error = %e, "Watch-list long average fetch failed");
            None
        }
    };

    WatchlistEntry::success(symbol, price, avg_200w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FetchStatus;
    use crate::services::testing::ScriptedSource;

    #[tokio::test]
    async fn test_batch_returns_one_entry_per_symbol() {
        let source = ScriptedSource::new()
            .with_daily("GOOD.NS", vec![100.0, 101.0])
            .with_weekly("GOOD.NS", vec![90.0; 200])
            .with_daily_fault("BROKEN.NS");

        let mut entries =
            fetch_watchlist(&source, &["GOOD", "MISSING", "BROKEN"], None).await;
        entries.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].symbol, "BROKEN");
        assert!(matches!(entries[0].status, FetchStatus::Error(_)));
        assert_eq!(entries[1].symbol, "GOOD");
        assert_eq!(entries[1].status, FetchStatus::Success);
        assert_eq!(entries[1].price, Some(101.0));
        assert_eq!(entries[1].avg_200w, Some(90.0));
        assert_eq!(entries[2].symbol, "MISSING");
        assert_eq!(entries[2].status, FetchStatus::NoData);
        assert_eq!(entries[2].price, None);
    }

    #[tokio::test]
    async fn test_long_average_fault_keeps_price_entry() {
        let source = ScriptedSource::new()
            .with_daily("HALF.NS", vec![55.0])
            .with_weekly_fault("HALF.NS");

        let entries = fetch_watchlist(&source, &["HALF"], None).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, FetchStatus::Success);
        assert_eq!(entries[0].price, Some(55.0));
        assert_eq!(entries[0].avg_200w, None);
    }

    #[tokio::test]
    async fn test_prefix_filter_is_case_insensitive() {
        let source = ScriptedSource::new()
            .with_daily("RELIANCE.NS", vec![2850.0])
            .with_daily("RECLTD.NS", vec![500.0]);

        let mut entries =
            fetch_watchlist(&source, &["RELIANCE", "RECLTD", "TCS"], Some("re")).await;
        entries.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].symbol, "RECLTD");
        assert_eq!(entries[1].symbol, "RELIANCE");
    }

    #[tokio::test]
    async fn test_blank_filter_keeps_all_symbols() {
        let source = ScriptedSource::new();

        let entries = fetch_watchlist(&source, &["A", "B"], Some("  ")).await;
        assert_eq!(entries.len(), 2);
    }
}
