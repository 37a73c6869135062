//! Process-scoped cache of last-seen live market data.
//!
//! Replaces ambient module-level maps with an explicit state object: created
//! at startup, shared through application state, bounded, and time-evicted.
//! Entries expire after a TTL (default 24 hours) and the least recently
//! touched entry is evicted once the cache is at capacity.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Last observed tick for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveTick {
    pub ltp: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: i64,
    pub oi: i64,
    pub received_at: DateTime<Utc>,
}

struct Entry {
    tick: LiveTick,
    last_touched: DateTime<Utc>,
}

/// Bounded symbol → tick map with TTL and least-recently-used eviction.
pub struct LiveDataCache {
    entries: HashMap<String, Entry>,
    capacity: usize,
    ttl: Duration,
}

impl LiveDataCache {
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            ttl,
        }
    }

    /// Default sizing: one trading day of option symbols, 24-hour TTL.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(2048, Duration::hours(24))
    }

    /// Inserts or replaces the tick for a symbol, evicting the least
    /// recently touched entry if the cache is full.
    pub fn insert(&mut self, symbol: impl Into<String>, tick: LiveTick, now: DateTime<Utc>) {
        let symbol = symbol.into();
        self.evict_expired(now);
        if !self.entries.contains_key(&symbol) && self.entries.len() >= self.capacity {
            if let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_touched)
                .map(|(k, _)| k.clone())
            {
                tracing::debug!(symbol = %oldest, "Evicting live-data entry at capacity");
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(
            symbol,
            Entry {
                tick,
                last_touched: now,
            },
        );
    }

    /// Returns the cached tick for a symbol, if present and not expired.
    /// A hit refreshes the entry's recency.
    pub fn get(&mut self, symbol: &str, now: DateTime<Utc>) -> Option<LiveTick> {
        let ttl = self.ttl;
        match self.entries.get_mut(symbol) {
            Some(entry) if now - entry.tick.received_at < ttl => {
                entry.last_touched = now;
                Some(entry.tick.clone())
            }
            Some(_) => {
                self.entries.remove(symbol);
                None
            }
            None => None,
        }
    }

    /// Number of live (possibly stale-but-unexpired) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_expired(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| now - e.tick.received_at < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(ltp: f64, received_at: DateTime<Utc>) -> LiveTick {
        LiveTick {
            ltp,
            open: ltp,
            high: ltp,
            low: ltp,
            volume: 0,
            oi: 0,
            received_at,
        }
    }

    fn t0() -> DateTime<Utc> {
        "2025-07-01T09:30:00Z".parse().unwrap()
    }

    #[test]
    fn get_returns_fresh_entry() {
        let mut cache = LiveDataCache::with_defaults();
        cache.insert("NSE:NIFTY50-INDEX", tick(22_500.0, t0()), t0());
        let hit = cache.get("NSE:NIFTY50-INDEX", t0() + Duration::minutes(5));
        assert_eq!(hit.map(|t| t.ltp), Some(22_500.0));
    }

    #[test]
    fn expired_entry_is_absent_and_removed() {
        let mut cache = LiveDataCache::with_defaults();
        cache.insert("NSE:NIFTY50-INDEX", tick(22_500.0, t0()), t0());
        let later = t0() + Duration::hours(25);
        assert!(cache.get("NSE:NIFTY50-INDEX", later).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_evicts_least_recently_touched() {
        let mut cache = LiveDataCache::new(2, Duration::hours(24));
        cache.insert("A", tick(1.0, t0()), t0());
        cache.insert("B", tick(2.0, t0()), t0() + Duration::seconds(1));
        // Touch A so B becomes the eviction candidate.
        cache.get("A", t0() + Duration::seconds(2));
        cache.insert("C", tick(3.0, t0()), t0() + Duration::seconds(3));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("B", t0() + Duration::seconds(4)).is_none());
        assert!(cache.get("A", t0() + Duration::seconds(4)).is_some());
        assert!(cache.get("C", t0() + Duration::seconds(4)).is_some());
    }
}
