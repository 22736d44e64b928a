//! Per-ticker memoisation of loaded price series

use crate::data::PriceSeries;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// A cached series together with the time it was fetched
#[derive(Debug, Clone)]
pub struct CachedSeries {
    pub series: PriceSeries,
    pub fetched_at: DateTime<Utc>,
}

impl CachedSeries {
    /// Age of the entry relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.fetched_at)
    }
}

/// Ticker keyed cache of price series.
///
/// Entries are not time aware: they stay valid until invalidated or cleared.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: HashMap<String, CachedSeries>,
    hits: u64,
    misses: u64,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `ticker`, counting the hit or miss
    pub fn lookup(&mut self, ticker: &str) -> Option<&CachedSeries> {
        match self.entries.get(ticker) {
            Some(entry) => {
                self.hits += 1;
                Some(entry)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Peek without touching the counters
    pub fn get(&self, ticker: &str) -> Option<&CachedSeries> {
        self.entries.get(ticker)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.entries.contains_key(ticker)
    }

    pub fn insert(&mut self, ticker: &str, series: PriceSeries, fetched_at: DateTime<Utc>) {
        self.entries.insert(
            ticker.to_string(),
            CachedSeries { series, fetched_at },
        );
    }

    /// Drop one ticker, returning whether it was cached
    pub fn invalidate(&mut self, ticker: &str) -> bool {
        let removed = self.entries.remove(ticker).is_some();
        if removed {
            log::info!("Invalidated cached series for {}", ticker);
        }
        removed
    }

    pub fn clear(&mut self) {
        log::info!("Clearing {} cached series", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
