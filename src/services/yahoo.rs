//! Yahoo Finance market-data client.
//!
//! Two endpoints are consumed: the v8 chart API for historical close-price
//! series and the v7 quote API for provider-precomputed metadata (50d/200d
//! averages, 52-week range). Yahoo has no official API; both payloads are
//! treated as possibly empty or partial, and every query has a fallback path.

use crate::constants::{CHART_HOST_FALLBACK, CHART_HOST_PRIMARY, QUOTE_HOST};
use crate::error::{Error, Result};
use crate::models::{Interval, PricePoint, SeriesOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tracing::{debug, warn};

/// Provider-precomputed per-symbol metadata. Absent fields stay `None`;
/// nothing here is recomputed from series data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSummary {
    pub regular_market_price: Option<f64>,
    pub fifty_day_average: Option<f64>,
    pub two_hundred_day_average: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

/// Abstraction over the market-data provider so the pipeline can be
/// exercised against scripted data in tests.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch a close-price series for one symbol over the trailing
    /// `lookback_days` calendar days. An empty result is a valid outcome.
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: Interval,
        lookback_days: i64,
    ) -> Result<SeriesOutcome>;

    /// Fetch quote metadata for one symbol, `None` when the provider does
    /// not know the symbol.
    async fn fetch_summary(&self, symbol: &str) -> Result<Option<QuoteSummary>>;
}

// v8 chart API payload. The indicators block may carry an adjusted-close
// table alongside the raw quote table, or neither with usable values.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
    adjclose: Option<Vec<AdjCloseBlock>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseBlock {
    adjclose: Vec<Option<f64>>,
}

// v7 quote API payload
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResult,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    result: Option<Vec<QuoteSummary>>,
}

/// HTTP client for the Yahoo chart and quote APIs
pub struct YahooClient {
    client: reqwest::Client,
    chart_hosts: [String; 2],
    quote_host: String,
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            chart_hosts: [CHART_HOST_PRIMARY.to_string(), CHART_HOST_FALLBACK.to_string()],
            quote_host: QUOTE_HOST.to_string(),
        })
    }

    fn chart_url(&self, host: &str, symbol: &str, interval: Interval, lookback_days: i64) -> String {
        let end = Utc::now();
        let start = end - Duration::days(lookback_days);
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval={}&includeAdjustedClose=true",
            host,
            symbol,
            start.timestamp(),
            end.timestamp(),
            interval.to_yahoo_format()
        )
    }

    async fn fetch_chart(
        &self,
        host: &str,
        symbol: &str,
        interval: Interval,
        lookback_days: i64,
    ) -> Result<SeriesOutcome> {
        let url = self.chart_url(host, symbol, interval, lookback_days);
        debug!(symbol = symbol, interval = interval.to_yahoo_format(), url = %url, "Fetching chart");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            // The chart API answers 404 for unknown symbols; that is a
            // no-data outcome, not an upstream fault.
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                debug!(symbol = symbol, "Chart API does not know symbol");
                return Ok(SeriesOutcome::Empty);
            }
            return Err(Error::Network(format!(
                "Chart API returned status {} for {}",
                response.status(),
                symbol
            )));
        }

        let body = response.text().await?;
        let parsed: ChartResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Chart payload for {}: {}", symbol, e)))?;

        parse_chart(symbol, parsed)
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Option<QuoteSummary>> {
        let url = format!("{}/v7/finance/quote?symbols={}", self.quote_host, symbol);
        debug!(symbol = symbol, "Fetching quote metadata");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Quote API returned status {} for {}",
                response.status(),
                symbol
            )));
        }

        let body = response.text().await?;
        let parsed: QuoteResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Quote payload for {}: {}", symbol, e)))?;

        Ok(parsed.quote_response.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }))
    }
}

#[async_trait]
impl MarketDataSource for YahooClient {
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: Interval,
        lookback_days: i64,
    ) -> Result<SeriesOutcome> {
        // Primary host first; an empty answer (or a fault) gets one retry
        // through the fallback host with identical parameters before the
        // fetch settles on Empty.
        match self
            .fetch_chart(&self.chart_hosts[0], symbol, interval, lookback_days)
            .await
        {
            Ok(SeriesOutcome::Series(points)) => return Ok(SeriesOutcome::Series(points)),
            Ok(SeriesOutcome::Empty) => {
                debug!(symbol = symbol, "Primary chart host returned no rows, retrying fallback");
            }
            Err(e) => {
                warn!(symbol = symbol, error = %e, "Primary chart host failed, retrying fallback");
            }
        }

        self.fetch_chart(&self.chart_hosts[1], symbol, interval, lookback_days)
            .await
    }

    async fn fetch_summary(&self, symbol: &str) -> Result<Option<QuoteSummary>> {
        self.fetch_quote(symbol).await
    }
}

/// Pick the close-price column out of an ambiguous indicators block:
/// adjusted close when it carries any value, then the plain close, then the
/// first other numeric field of the quote table.
fn select_closes(data: &ChartData) -> Option<&[Option<f64>]> {
    if let Some(adj) = data
        .indicators
        .adjclose
        .as_ref()
        .and_then(|blocks| blocks.first())
    {
        if adj.adjclose.iter().any(Option::is_some) {
            return Some(&adj.adjclose);
        }
    }

    let quote = data.indicators.quote.first()?;
    for field in [&quote.close, &quote.open, &quote.high, &quote.low] {
        if let Some(values) = field {
            if values.iter().any(Option::is_some) {
                return Some(values);
            }
        }
    }

    None
}

/// Reduce a chart payload to a normalized close series. Rows with missing
/// or non-positive values are dropped, never coerced to zero; timestamps
/// come out strictly ascending with duplicates removed.
fn parse_chart(symbol: &str, response: ChartResponse) -> Result<SeriesOutcome> {
    let result = match response.chart.result {
        Some(result) => result,
        None => {
            return match response.chart.error {
                Some(err) if err.code == "Not Found" => {
                    debug!(symbol = symbol, "Chart API has no data for symbol");
                    Ok(SeriesOutcome::Empty)
                }
                Some(err) => Err(Error::Parse(format!(
                    "Chart API error for {}: {}: {}",
                    symbol, err.code, err.description
                ))),
                None => Ok(SeriesOutcome::Empty),
            };
        }
    };

    let data = match result.into_iter().next() {
        Some(data) => data,
        None => return Ok(SeriesOutcome::Empty),
    };

    let timestamps = match &data.timestamp {
        Some(ts) if !ts.is_empty() => ts.clone(),
        _ => return Ok(SeriesOutcome::Empty),
    };

    let closes = match select_closes(&data) {
        Some(closes) => closes,
        None => return Ok(SeriesOutcome::Empty),
    };

    let mut points: Vec<PricePoint> = timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(&ts, close)| {
            let close = (*close)?;
            if !close.is_finite() || close <= 0.0 {
                return None;
            }
            let time: DateTime<Utc> = DateTime::from_timestamp(ts, 0)?;
            Some(PricePoint::new(time, close))
        })
        .collect();

    points.sort_by_key(|p| p.time);
    points.dedup_by_key(|p| p.time);

    Ok(SeriesOutcome::from_points(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_json(body: &str) -> ChartResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_parse_prefers_adjusted_close() {
        let response = chart_json(
            r#"{"chart":{"result":[{"timestamp":[1700000000,1700086400],
                "indicators":{"quote":[{"close":[100.0,101.0]}],
                "adjclose":[{"adjclose":[99.0,100.5]}]}}],"error":null}}"#,
        );

        let points = parse_chart("TEST", response)
            .unwrap()
            .into_points()
            .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 99.0);
        assert_eq!(points[1].close, 100.5);
    }

    #[test]
    fn test_parse_falls_back_to_plain_close() {
        let response = chart_json(
            r#"{"chart":{"result":[{"timestamp":[1700000000,1700086400],
                "indicators":{"quote":[{"close":[100.0,101.0]}]}}],"error":null}}"#,
        );

        let points = parse_chart("TEST", response)
            .unwrap()
            .into_points()
            .unwrap();
        assert_eq!(points[0].close, 100.0);
        assert_eq!(points[1].close, 101.0);
    }

    #[test]
    fn test_parse_skips_all_null_adjclose() {
        let response = chart_json(
            r#"{"chart":{"result":[{"timestamp":[1700000000],
                "indicators":{"quote":[{"close":[42.0]}],
                "adjclose":[{"adjclose":[null]}]}}],"error":null}}"#,
        );

        let points = parse_chart("TEST", response)
            .unwrap()
            .into_points()
            .unwrap();
        assert_eq!(points[0].close, 42.0);
    }

    #[test]
    fn test_parse_first_numeric_field_fallback() {
        // No close column at all; open is the first field carrying values
        let response = chart_json(
            r#"{"chart":{"result":[{"timestamp":[1700000000],
                "indicators":{"quote":[{"open":[55.5]}]}}],"error":null}}"#,
        );

        let points = parse_chart("TEST", response)
            .unwrap()
            .into_points()
            .unwrap();
        assert_eq!(points[0].close, 55.5);
    }

    #[test]
    fn test_parse_drops_null_rows() {
        let response = chart_json(
            r#"{"chart":{"result":[{"timestamp":[1700000000,1700086400,1700172800],
                "indicators":{"quote":[{"close":[100.0,null,102.0]}]}}],"error":null}}"#,
        );

        let points = parse_chart("TEST", response)
            .unwrap()
            .into_points()
            .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 100.0);
        assert_eq!(points[1].close, 102.0);
    }

    #[test]
    fn test_parse_not_found_is_empty_not_error() {
        let response = chart_json(
            r#"{"chart":{"result":null,
                "error":{"code":"Not Found","description":"No data found"}}}"#,
        );

        assert!(parse_chart("MISSING", response).unwrap().is_empty());
    }

    #[test]
    fn test_parse_empty_timestamps_is_empty() {
        let response = chart_json(
            r#"{"chart":{"result":[{"timestamp":[],
                "indicators":{"quote":[{"close":[]}]}}],"error":null}}"#,
        );

        assert!(parse_chart("TEST", response).unwrap().is_empty());
    }

    #[test]
    fn test_quote_summary_field_mapping() {
        let body = r#"{"quoteResponse":{"result":[{
            "regularMarketPrice": 2850.5,
            "fiftyDayAverage": 2800.0,
            "twoHundredDayAverage": 2650.25,
            "fiftyTwoWeekHigh": 3024.9,
            "fiftyTwoWeekLow": 2220.3,
            "shortName": "Reliance Industries"
        }],"error":null}}"#;

        let parsed: QuoteResponse = serde_json::from_str(body).unwrap();
        let summary = parsed.quote_response.result.unwrap().remove(0);
        assert_eq!(summary.regular_market_price, Some(2850.5));
        assert_eq!(summary.two_hundred_day_average, Some(2650.25));
        assert_eq!(summary.fifty_two_week_high, Some(3024.9));
        assert_eq!(summary.fifty_two_week_low, Some(2220.3));
    }
}
