//! Exchange symbol directory used for autocomplete search.
//!
//! The NSE publishes the full equity list as a CSV snapshot. One cached copy
//! lives in the process, replaced wholesale once it is older than the
//! staleness window; a failed refresh serves the stale copy rather than
//! surfacing the error to search callers.

use crate::constants::{DIRECTORY_MAX_AGE_SECS, DIRECTORY_URL};
use crate::error::{Error, Result};
use crate::models::DirectoryEntry;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Source of the full symbol directory
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn fetch_directory(&self) -> Result<Vec<DirectoryEntry>>;
}

/// Directory source backed by the NSE equity-list CSV
pub struct NseDirectorySource {
    client: reqwest::Client,
    url: String,
}

impl NseDirectorySource {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: DIRECTORY_URL.to_string(),
        })
    }
}

#[async_trait]
impl DirectorySource for NseDirectorySource {
    async fn fetch_directory(&self) -> Result<Vec<DirectoryEntry>> {
        debug!(url = %self.url, "Fetching symbol directory");

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Directory fetch returned status {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        parse_directory_csv(&body)
    }
}

/// Parse the equity-list CSV into directory rows, in file order. Rows
/// missing the symbol or name column are skipped.
fn parse_directory_csv(bytes: &[u8]) -> Result<Vec<DirectoryEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let symbol_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("SYMBOL"))
        .unwrap_or(0);
    let name_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("NAME OF COMPANY"))
        .unwrap_or(1);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let symbol = record.get(symbol_idx).unwrap_or("");
        let name = record.get(name_idx).unwrap_or("");
        if symbol.is_empty() {
            continue;
        }
        entries.push(DirectoryEntry::new(symbol, name));
    }

    Ok(entries)
}

struct CachedSnapshot {
    entries: Vec<DirectoryEntry>,
    fetched_at: Instant,
}

/// Process-wide, time-boxed directory snapshot
pub struct DirectoryCache {
    source: Arc<dyn DirectorySource>,
    max_age: StdDuration,
    snapshot: RwLock<Option<CachedSnapshot>>,
}

impl DirectoryCache {
    pub fn new(source: Arc<dyn DirectorySource>) -> Self {
        Self::with_max_age(source, StdDuration::from_secs(DIRECTORY_MAX_AGE_SECS))
    }

    pub fn with_max_age(source: Arc<dyn DirectorySource>, max_age: StdDuration) -> Self {
        Self {
            source,
            max_age,
            snapshot: RwLock::new(None),
        }
    }

    /// Case-insensitive substring search against symbol or company name,
    /// truncated to `limit` in directory row order. Never fails: a refresh
    /// error falls back to the stale snapshot, or an empty result when no
    /// snapshot exists yet.
    pub async fn lookup(&self, query: &str, limit: usize) -> Vec<DirectoryEntry> {
        self.refresh_if_stale().await;

        let guard = self.snapshot.read().await;
        let Some(snapshot) = guard.as_ref() else {
            return Vec::new();
        };

        let needle = query.trim().to_uppercase();
        snapshot
            .entries
            .iter()
            .filter(|e| {
                e.symbol.to_uppercase().contains(&needle)
                    || e.name.to_uppercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect()
    }

    async fn refresh_if_stale(&self) {
        {
            let guard = self.snapshot.read().await;
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.fetched_at.elapsed() < self.max_age {
                    return;
                }
            }
        }

        let mut guard = self.snapshot.write().await;
        // Re-check under the write lock; a concurrent refresh may have won
        if let Some(snapshot) = guard.as_ref() {
            if snapshot.fetched_at.elapsed() < self.max_age {
                return;
            }
        }

        match self.source.fetch_directory().await {
            Ok(entries) => {
                info!(rows = entries.len(), "Directory snapshot refreshed");
                *guard = Some(CachedSnapshot {
                    entries,
                    fetched_at: Instant::now(),
                });
            }
            Err(e) => {
                warn!(error = %e, "Directory refresh failed, keeping stale snapshot");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedDirectory {
        entries: Vec<DirectoryEntry>,
        fetches: AtomicUsize,
        fail_after: usize,
    }

    impl ScriptedDirectory {
        fn new(entries: Vec<DirectoryEntry>) -> Self {
            Self {
                entries,
                fetches: AtomicUsize::new(0),
                fail_after: usize::MAX,
            }
        }

        fn failing_after(mut self, fetches: usize) -> Self {
            self.fail_after = fetches;
            self
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DirectorySource for ScriptedDirectory {
        async fn fetch_directory(&self) -> Result<Vec<DirectoryEntry>> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst);
            if n >= self.fail_after {
                return Err(Error::Network("scripted directory fault".to_string()));
            }
            Ok(self.entries.clone())
        }
    }

    fn sample_entries() -> Vec<DirectoryEntry> {
        vec![
            DirectoryEntry::new("RELIANCE", "Reliance Industries Limited"),
            DirectoryEntry::new("RECLTD", "REC Limited"),
            DirectoryEntry::new("TCS", "Tata Consultancy Services Limited"),
            DirectoryEntry::new("ABCORP", "Amber Relay Corporation Limited"),
        ]
    }

    #[tokio::test]
    async fn test_snapshot_reused_within_staleness_window() {
        let source = Arc::new(ScriptedDirectory::new(sample_entries()));
        let cache = DirectoryCache::with_max_age(source.clone(), StdDuration::from_secs(3600));

        let first = cache.lookup("REL", 10).await;
        let second = cache.lookup("REL", 10).await;

        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_expired_snapshot_triggers_one_refresh() {
        let source = Arc::new(ScriptedDirectory::new(sample_entries()));
        let cache = DirectoryCache::with_max_age(source.clone(), StdDuration::ZERO);

        cache.lookup("REL", 10).await;
        cache.lookup("REL", 10).await;

        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_serves_stale_snapshot() {
        let source = Arc::new(ScriptedDirectory::new(sample_entries()).failing_after(1));
        let cache = DirectoryCache::with_max_age(source.clone(), StdDuration::ZERO);

        let fresh = cache.lookup("TCS", 10).await;
        assert_eq!(fresh.len(), 1);

        // Second refresh faults; the stale rows still answer
        let stale = cache.lookup("TCS", 10).await;
        assert_eq!(stale, fresh);
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_lookup_without_any_snapshot_is_empty() {
        let source = Arc::new(ScriptedDirectory::new(sample_entries()).failing_after(0));
        let cache = DirectoryCache::with_max_age(source, StdDuration::from_secs(3600));

        assert!(cache.lookup("REL", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_matches_symbol_and_name_case_insensitively() {
        let source = Arc::new(ScriptedDirectory::new(sample_entries()));
        let cache = DirectoryCache::new(source);

        // Symbol hit plus a name-only substring hit, in row order
        let hits = cache.lookup("rel", 10).await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].symbol, "RELIANCE");
        assert_eq!(hits[1].symbol, "ABCORP");

        // Name-only substring hit
        let tata = cache.lookup("tata", 10).await;
        assert_eq!(tata.len(), 1);
        assert_eq!(tata[0].symbol, "TCS");
    }

    #[tokio::test]
    async fn test_lookup_respects_limit() {
        let source = Arc::new(ScriptedDirectory::new(sample_entries()));
        let cache = DirectoryCache::new(source);

        let hits = cache.lookup("", 2).await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].symbol, "RELIANCE");
    }

    #[test]
    fn test_parse_directory_csv_picks_named_columns() {
        let csv = "SYMBOL,NAME OF COMPANY, SERIES\nRELIANCE,Reliance Industries Limited,EQ\nTCS,Tata Consultancy Services Limited,EQ\n";
        let entries = parse_directory_csv(csv.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], DirectoryEntry::new("RELIANCE", "Reliance Industries Limited"));
    }

    #[test]
    fn test_parse_directory_csv_skips_blank_symbols() {
        let csv = "SYMBOL,NAME OF COMPANY\n,Ghost Company\nTCS,Tata Consultancy Services Limited\n";
        let entries = parse_directory_csv(csv.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].symbol, "TCS");
    }
}
