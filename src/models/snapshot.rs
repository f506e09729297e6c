use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Three-way recommendation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Advice {
    Buy,
    Avoid,
    Neutral,
}

/// Recommendation with its human-readable explanation.
/// Derivation never fails; missing inputs degrade to neutral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "rec_type")]
    pub kind: Advice,
    #[serde(rename = "rec_text")]
    pub text: String,
}

impl Recommendation {
    pub fn new(kind: Advice, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Full response record for one ticker. Built fresh per request and never
/// mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct StockSnapshot {
    /// Provider-resolvable symbol form, possibly `.NS`-suffixed
    pub ticker: String,

    pub latest_price: Option<f64>,

    /// Window label ("5d" .. "200d", "200w") to trailing mean.
    /// `None` means fewer samples than the window required.
    pub averages: BTreeMap<String, Option<f64>>,

    /// Total weekly samples the provider returned
    pub weeks_available: usize,

    /// Samples actually averaged: min(weeks_available, 200)
    pub weeks_used: usize,

    /// Percent distance of the latest price from the 200-week average
    pub diff_pct: Option<f64>,

    /// 52-week range from provider metadata, never recomputed
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,

    #[serde(flatten)]
    pub recommendation: Recommendation,
}

/// Per-symbol outcome of a watch-list batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Success,
    NoData,
    Error(String),
}

// Wire format kept flat ("success" / "no_data" / "error: <message>") for the
// watch-list table consumers.
impl Serialize for FetchStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FetchStatus::Success => serializer.serialize_str("success"),
            FetchStatus::NoData => serializer.serialize_str("no_data"),
            FetchStatus::Error(message) => {
                serializer.serialize_str(&format!("error: {}", message))
            }
        }
    }
}

/// One row of a watch-list batch result
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistEntry {
    pub symbol: String,
    pub price: Option<f64>,
    pub avg_200w: Option<f64>,
    pub status: FetchStatus,
}

impl WatchlistEntry {
    pub fn success(symbol: impl Into<String>, price: f64, avg_200w: Option<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            price: Some(price),
            avg_200w,
            status: FetchStatus::Success,
        }
    }

    pub fn no_data(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: None,
            avg_200w: None,
            status: FetchStatus::NoData,
        }
    }

    pub fn error(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: None,
            avg_200w: None,
            status: FetchStatus::Error(message.into()),
        }
    }
}
