pub mod averages;
pub mod directory;
pub mod normalizer;
pub mod watchlist;
pub mod yahoo;

#[cfg(test)]
pub(crate) mod testing;

pub use averages::{all_averages, daily_series, trailing_mean, weekly_average_200, WeeklyAverage};
pub use directory::{DirectoryCache, DirectorySource, NseDirectorySource};
pub use normalizer::normalize;
pub use watchlist::fetch_watchlist;
pub use yahoo::{MarketDataSource, QuoteSummary, YahooClient};
