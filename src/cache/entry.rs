//! Cache entries and statistics

use crate::output::AnalysisResult;
use std::time::Duration;
use tokio::time::Instant;

/// A cached analysis result with its expiry
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored result
    pub result: AnalysisResult,

    /// When the entry stops being served
    pub expires_at: Instant,
}

impl CacheEntry {
    /// Creates an entry that stays live for `ttl` from now
    pub fn new(result: AnalysisResult, ttl: Duration) -> Self {
        Self {
            result,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Checks if the entry has expired as of `now`
    ///
    /// An entry is live strictly before `expires_at`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Checks if the entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// Point-in-time cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls answered from the cache
    pub hits: u64,

    /// Calls that had to run the analysis (or join one already running)
    pub misses: u64,

    /// Entries currently stored, live or not yet swept
    pub entries: usize,
}
