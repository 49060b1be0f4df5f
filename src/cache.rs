//! Route resolution caching
//!
//! Remembers which table entry an address matched (or that nothing matched)
//! with LRU eviction. Only the raw match is cached: resolver destinations
//! still run on every lookup.

use crate::params::RouteArgs;
use crate::trace_log;
use lru::LruCache;
use std::num::NonZeroUsize;

/// A cached lookup: index of the winning table entry and its captured
/// arguments, or `None` when no entry matched.
pub type CachedMatch = Option<(usize, RouteArgs)>;

/// Cache performance statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidations: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Address → match cache with LRU eviction
///
/// Default capacity: 256 entries.
#[derive(Debug)]
pub struct RouteCache {
    matches: LruCache<String, CachedMatch>,
    stats: CacheStats,
}

impl RouteCache {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// A capacity of zero is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            matches: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    pub fn get(&mut self, address: &str) -> Option<CachedMatch> {
        if let Some(cached) = self.matches.get(address) {
            self.stats.hits += 1;
            trace_log!("Route cache hit for '{}'", address);
            Some(cached.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Route cache miss for '{}'", address);
            None
        }
    }

    pub fn insert(&mut self, address: String, found: CachedMatch) {
        self.matches.push(address, found);
    }

    pub fn clear(&mut self) {
        trace_log!("Clearing route cache");
        self.matches.clear();
        self.stats.invalidations += 1;
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}
