//! Scripted market-data source for exercising the pipeline without a
//! network.

use crate::error::{Error, Result};
use crate::models::{Interval, PricePoint, SeriesOutcome};
use crate::services::yahoo::{MarketDataSource, QuoteSummary};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build a series with synthetic ascending timestamps from bare closes
pub(crate) fn points_from_closes(closes: &[f64], interval: Interval) -> Vec<PricePoint> {
    let step = match interval {
        Interval::Daily => Duration::days(1),
        Interval::Weekly => Duration::weeks(1),
    };
    let start = Utc.with_ymd_and_hms(2020, 1, 6, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(start + step * i as i32, close))
        .collect()
}

enum Scripted {
    Series(Vec<f64>),
    Fault,
}

/// In-memory `MarketDataSource`: per-symbol scripted series, summaries, and
/// faults. Unknown symbols answer `Empty`. Counts series fetches so tests
/// can assert how many probes a path issued.
pub(crate) struct ScriptedSource {
    daily: HashMap<String, Scripted>,
    weekly: HashMap<String, Scripted>,
    summaries: HashMap<String, QuoteSummary>,
    series_fetches: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            daily: HashMap::new(),
            weekly: HashMap::new(),
            summaries: HashMap::new(),
            series_fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_daily(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.daily.insert(symbol.to_string(), Scripted::Series(closes));
        self
    }

    pub fn with_daily_fault(mut self, symbol: &str) -> Self {
        self.daily.insert(symbol.to_string(), Scripted::Fault);
        self
    }

    pub fn with_weekly(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.weekly.insert(symbol.to_string(), Scripted::Series(closes));
        self
    }

    pub fn with_weekly_fault(mut self, symbol: &str) -> Self {
        self.weekly.insert(symbol.to_string(), Scripted::Fault);
        self
    }

    pub fn with_summary(mut self, symbol: &str, summary: QuoteSummary) -> Self {
        self.summaries.insert(symbol.to_string(), summary);
        self
    }

    pub fn series_calls(&self) -> usize {
        self.series_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for ScriptedSource {
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: Interval,
        _lookback_days: i64,
    ) -> Result<SeriesOutcome> {
        self.series_fetches.fetch_add(1, Ordering::SeqCst);

        let scripted = match interval {
            Interval::Daily => self.daily.get(symbol),
            Interval::Weekly => self.weekly.get(symbol),
        };

        match scripted {
            None => Ok(SeriesOutcome::Empty),
            Some(Scripted::Fault) => {
                Err(Error::Network(format!("scripted fault for {}", symbol)))
            }
            Some(Scripted::Series(closes)) => {
                Ok(SeriesOutcome::from_points(points_from_closes(closes, interval)))
            }
        }
    }

    async fn fetch_summary(&self, symbol: &str) -> Result<Option<QuoteSummary>> {
        Ok(self.summaries.get(symbol).cloned())
    }
}
