//! Trailing-mean computation and recommendation derivation.
//!
//! The long-horizon heuristic: a price below its 200-week average marks a
//! buy candidate, above marks an avoid. Sub-averages over shorter windows
//! are decoration on the snapshot and are always best-effort.

use crate::constants::{
    DAILY_CHART_LOOKBACK_DAYS, LATEST_PRICE_LOOKBACK_DAYS, LONG_AVERAGE_WEEKS, MA_WINDOWS,
    WEEKLY_FETCH_WEEKS,
};
use crate::error::{Error, Result};
use crate::models::{
    Advice, DailySeries, Interval, PricePoint, Recommendation, SeriesOutcome, StockSnapshot,
};
use crate::services::normalizer::normalize;
use crate::services::yahoo::MarketDataSource;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

pub const REC_BUY_TEXT: &str = "Good to buy - price is below the 200-week average";
pub const REC_AVOID_TEXT: &str = "Do not buy - price is above the 200-week average";
pub const REC_EQUAL_TEXT: &str = "Price equals the 200-week average";
pub const REC_INSUFFICIENT_TEXT: &str = "Insufficient data to form a recommendation";

/// Unweighted arithmetic mean of the last `window` samples, `None` when the
/// series is shorter than the window.
pub fn trailing_mean(series: &[PricePoint], window: usize) -> Option<f64> {
    if window == 0 || series.len() < window {
        return None;
    }
    let tail = &series[series.len() - window..];
    Some(tail.iter().map(|p| p.close).sum::<f64>() / window as f64)
}

/// Percent distance of `latest` from `avg`; undefined when either side is
/// missing or the average is zero.
pub fn diff_pct(latest: Option<f64>, avg: Option<f64>) -> Option<f64> {
    match (latest, avg) {
        (Some(latest), Some(avg)) if avg != 0.0 => Some((latest - avg) / avg * 100.0),
        _ => None,
    }
}

/// Three-way recommendation from the latest price vs the long average.
/// Strict comparisons; exact equality is its own (neutral) outcome, distinct
/// from the missing-data case.
pub fn derive_recommendation(latest: Option<f64>, avg: Option<f64>) -> Recommendation {
    match (latest, avg) {
        (Some(latest), Some(avg)) => {
            if latest < avg {
                Recommendation::new(Advice::Buy, REC_BUY_TEXT)
            } else if latest > avg {
                Recommendation::new(Advice::Avoid, REC_AVOID_TEXT)
            } else {
                Recommendation::new(Advice::Neutral, REC_EQUAL_TEXT)
            }
        }
        _ => Recommendation::new(Advice::Neutral, REC_INSUFFICIENT_TEXT),
    }
}

/// Long-horizon result over a weekly close series
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyAverage {
    pub weeks_available: usize,
    pub weeks_used: usize,
    pub avg_200_week: Option<f64>,
    pub latest_price: Option<f64>,
    pub diff_pct: Option<f64>,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

/// Average over up to 200 trailing weekly samples. The average is missing
/// only when the series itself is empty; shorter histories average whatever
/// is available.
pub fn weekly_average_200(series: &[PricePoint]) -> WeeklyAverage {
    let weeks_available = series.len();
    let weeks_used = weeks_available.min(LONG_AVERAGE_WEEKS);
    let avg_200_week = trailing_mean(series, weeks_used);
    let latest_price = series.last().map(|p| p.close);

    WeeklyAverage {
        weeks_available,
        weeks_used,
        avg_200_week,
        latest_price,
        diff_pct: diff_pct(latest_price, avg_200_week),
        recommendation: derive_recommendation(latest_price, avg_200_week),
    }
}

fn window_label(window: usize) -> String {
    format!("{}d", window)
}

/// Build the full snapshot for one user-supplied ticker.
///
/// The ticker is normalized exactly once. The latest price is load-bearing:
/// failing to obtain it fails the whole call. Every individual sub-average
/// degrades to `None` on failure without aborting the rest.
pub async fn all_averages<S: MarketDataSource + ?Sized>(
    source: &S,
    raw_ticker: &str,
) -> Result<StockSnapshot> {
    if raw_ticker.trim().is_empty() {
        return Err(Error::InvalidInput("Ticker must not be empty".to_string()));
    }

    let ticker = normalize(source, raw_ticker).await;

    let latest_price = source
        .fetch_series(&ticker, Interval::Daily, LATEST_PRICE_LOOKBACK_DAYS)
        .await?
        .into_points()
        .and_then(|points| points.last().map(|p| p.close))
        .ok_or_else(|| Error::NoData(format!("No recent price data for {}", ticker)))?;

    let daily_year = match source
        .fetch_series(&ticker, Interval::Daily, DAILY_CHART_LOOKBACK_DAYS)
        .await
    {
        Ok(outcome) => outcome.into_points().unwrap_or_default(),
        Err(e) => {
            warn!(ticker = %ticker, error = %e, "Daily series fetch failed, sub-averages degrade");
            Vec::new()
        }
    };

    let summary = match source.fetch_summary(&ticker).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!(ticker = %ticker, error = %e, "Quote metadata fetch failed");
            None
        }
    };

    let weekly = match source
        .fetch_series(&ticker, Interval::Weekly, WEEKLY_FETCH_WEEKS * 7)
        .await
    {
        Ok(outcome) => outcome.into_points().unwrap_or_default(),
        Err(e) => {
            warn!(ticker = %ticker, error = %e, "Weekly series fetch failed, long average degrades");
            Vec::new()
        }
    };
    let weekly_avg = weekly_average_200(&weekly);

    let mut averages: BTreeMap<String, Option<f64>> = BTreeMap::new();
    for &window in MA_WINDOWS {
        if window == 200 {
            continue;
        }
        averages.insert(window_label(window), trailing_mean(&daily_year, window));
    }

    // The provider precomputes the 200-day mean; fall back to computing it
    // from the year of daily closes when the metadata lacks it.
    let ma200 = summary
        .as_ref()
        .and_then(|s| s.two_hundred_day_average)
        .or_else(|| trailing_mean(&daily_year, 200));
    averages.insert(window_label(200), ma200);
    averages.insert("200w".to_string(), weekly_avg.avg_200_week);

    Ok(StockSnapshot {
        latest_price: Some(latest_price),
        averages,
        weeks_available: weekly_avg.weeks_available,
        weeks_used: weekly_avg.weeks_used,
        diff_pct: diff_pct(Some(latest_price), weekly_avg.avg_200_week),
        fifty_two_week_high: summary.as_ref().and_then(|s| s.fifty_two_week_high),
        fifty_two_week_low: summary.as_ref().and_then(|s| s.fifty_two_week_low),
        recommendation: derive_recommendation(Some(latest_price), weekly_avg.avg_200_week),
        ticker,
    })
}

/// Daily close series for the result-page chart. Takes an already-canonical
/// ticker so the caller's single normalization stays the only one. No data
/// is an empty payload, not an error.
pub async fn daily_series<S: MarketDataSource + ?Sized>(
    source: &S,
    ticker: &str,
    lookback_days: i64,
) -> Result<DailySeries> {
    match source
        .fetch_series(ticker, Interval::Daily, lookback_days)
        .await?
    {
        SeriesOutcome::Empty => Ok(DailySeries::empty()),
        SeriesOutcome::Series(points) => Ok(DailySeries::from_points(&points)),
    }
}
