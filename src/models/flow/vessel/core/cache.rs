//! Advisory bracket cache.
//!
//! A successful search stores its area bracket keyed by process and gas, and
//! later searches try that bracket first. Entries are hints only: a missing,
//! stale, or unusable entry falls back to the default bracket, so any cache
//! implementation (including [`NoCache`]) gives the same answers.

use std::{collections::HashMap, fmt};

use jiff::{SignedDuration, Timestamp};
use uom::si::f64::Area;

use super::Process;

/// Cache key: the process direction and the gas name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub process: Process,
    pub gas: String,
}

impl CacheKey {
    #[must_use]
    pub fn new(process: Process, gas: impl Into<String>) -> Self {
        Self {
            process,
            gas: gas.into(),
        }
    }
}

/// An area bracket from a previous search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBracket {
    pub low: Area,
    pub high: Area,
}

/// Storage for bracket hints.
pub trait BracketCache {
    /// Returns the stored bracket for `key`, if one is available.
    fn get(&self, key: &CacheKey) -> Option<AreaBracket>;

    /// Stores a bracket for `key`, replacing any previous one.
    fn put(&mut self, key: CacheKey, bracket: AreaBracket);
}

/// A cache that stores nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoCache;

impl BracketCache for NoCache {
    fn get(&self, _key: &CacheKey) -> Option<AreaBracket> {
        None
    }

    fn put(&mut self, _key: CacheKey, _bracket: AreaBracket) {}
}

/// A stored bracket and when it was stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheEntry {
    pub bracket: AreaBracket,
    pub timestamp: Timestamp,
}

/// In-memory cache whose entries expire after a time-to-live.
///
/// The clock is injectable so expiry can be tested deterministically.
pub struct MemoryCache<C = fn() -> Timestamp> {
    entries: HashMap<CacheKey, CacheEntry>,
    ttl: SignedDuration,
    clock: C,
}

impl MemoryCache {
    /// Creates an empty cache using the system clock and a one hour TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Timestamp::now)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Fn() -> Timestamp> MemoryCache<C> {
    pub const DEFAULT_TTL: SignedDuration = SignedDuration::from_secs(3600);

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: Self::DEFAULT_TTL,
            clock,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: SignedDuration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the raw entry for `key`, fresh or not.
    #[must_use]
    pub fn entry(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry older than the TTL.
    pub fn evict_stale(&mut self) {
        let now = (self.clock)();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.duration_since(entry.timestamp) <= ttl);
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        (self.clock)().duration_since(entry.timestamp) <= self.ttl
    }
}

impl<C: Fn() -> Timestamp> BracketCache for MemoryCache<C> {
    fn get(&self, key: &CacheKey) -> Option<AreaBracket> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| entry.bracket)
    }

    fn put(&mut self, key: CacheKey, bracket: AreaBracket) {
        let timestamp = (self.clock)();
        self.entries.insert(key, CacheEntry { bracket, timestamp });
    }
}

impl<C> fmt::Debug for MemoryCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
