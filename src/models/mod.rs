mod directory;
mod series;
mod snapshot;

pub use directory::DirectoryEntry;
pub use series::{DailySeries, Interval, PricePoint, PriceSeries, SeriesOutcome};
pub use snapshot::{Advice, FetchStatus, Recommendation, StockSnapshot, WatchlistEntry};
