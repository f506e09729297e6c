use chrono::{DateTime, Utc};
use serde::Serialize;

/// One close-price sample. Prices are positive finite values; rows the
/// provider returned as null or non-numeric are dropped before a
/// `PricePoint` is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub time: DateTime<Utc>,
    pub close: f64,
}

impl PricePoint {
    pub fn new(time: DateTime<Utc>, close: f64) -> Self {
        Self { time, close }
    }
}

/// Close-price time series for a single ticker, strictly ascending by time
pub type PriceSeries = Vec<PricePoint>;

/// Sampling interval understood by the chart API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Daily,
    Weekly,
}

impl Interval {
    /// Interval code in the chart API query string
    pub fn to_yahoo_format(self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
        }
    }
}

/// Outcome of a series fetch. An empty series is a valid terminal outcome,
/// not an error; callers branch on it rather than catching anything.
#[derive(Debug, Clone)]
pub enum SeriesOutcome {
    Empty,
    Series(PriceSeries),
}

impl SeriesOutcome {
    /// Wrap a parsed series, mapping a zero-row result to `Empty`
    pub fn from_points(points: PriceSeries) -> Self {
        if points.is_empty() {
            SeriesOutcome::Empty
        } else {
            SeriesOutcome::Series(points)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SeriesOutcome::Empty)
    }

    pub fn into_points(self) -> Option<PriceSeries> {
        match self {
            SeriesOutcome::Empty => None,
            SeriesOutcome::Series(points) => Some(points),
        }
    }
}

/// Daily close series reshaped for the chart on the result page
#[derive(Debug, Clone, Serialize)]
pub struct DailySeries {
    pub dates: Vec<String>,
    pub closes: Vec<f64>,
}

impl DailySeries {
    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            closes: Vec::new(),
        }
    }

    pub fn from_points(points: &[PricePoint]) -> Self {
        Self {
            dates: points
                .iter()
                .map(|p| p.time.format("%Y-%m-%d").to_string())
                .collect(),
            closes: points.iter().map(|p| p.close).collect(),
        }
    }
}
