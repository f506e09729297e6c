//! Ticker normalization.
//!
//! Maps a user-supplied symbol to the form the provider resolves. Plain NSE
//! symbols need the `.NS` suffix; indices, forex pairs, and already-suffixed
//! symbols pass through untouched. Resolution probes are live network calls,
//! so callers normalize at most once per distinct ticker per request.

use crate::constants::{LATEST_PRICE_LOOKBACK_DAYS, NSE_SUFFIX};
use crate::models::Interval;
use crate::services::yahoo::MarketDataSource;
use tracing::debug;

// Symbols carrying any of these are fully qualified already: an exchange
// suffix (RELIANCE.NS), a forex pair (USDINR=X), an index (^NSEI), or a
// hyphenated listing (BAJAJ-AUTO on some feeds).
const QUALIFIED_CHARS: &[char] = &['.', '=', '^', '-'];

/// Resolve `raw` to a provider-canonical ticker. Never fails: when no probe
/// resolves, the trimmed upper-cased input comes back unchanged and the
/// caller gets a no-data outcome downstream.
pub async fn normalize<S: MarketDataSource + ?Sized>(source: &S, raw: &str) -> String {
    let ticker = raw.trim().to_uppercase();

    if ticker.contains(QUALIFIED_CHARS) {
        debug!(ticker = %ticker, "Ticker already qualified, skipping probes");
        return ticker;
    }

    if probe(source, &ticker).await {
        debug!(ticker = %ticker, "Bare symbol resolved");
        return ticker;
    }

    let suffixed = format!("{}{}", ticker, NSE_SUFFIX);
    if probe(source, &suffixed).await {
        debug!(ticker = %suffixed, "Resolved with NSE suffix");
        return suffixed;
    }

    debug!(ticker = %ticker, "No resolution, passing through unchanged");
    ticker
}

/// One resolution probe: does the provider have any recent daily data for
/// this symbol? Probe faults count as unresolved.
async fn probe<S: MarketDataSource + ?Sized>(source: &S, symbol: &str) -> bool {
    match source
        .fetch_series(symbol, Interval::Daily, LATEST_PRICE_LOOKBACK_DAYS)
        .await
    {
        Ok(outcome) => !outcome.is_empty(),
        Err(e) => {
            debug!(symbol = symbol, error = %e, "Resolution probe failed");
            false
        }
    }
}
