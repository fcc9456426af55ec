//! Result cache for analyses
//!
//! [`CachedAnalyzer`] sits in front of any [`Analyze`] implementation and
//! memoizes successful results per URL for a fixed time-to-live. Keys are the
//! URL strings exactly as requested: `http://x.com` and `http://x.com/` are
//! different entries.
//!
//! Concurrent misses for the same URL share a single underlying analysis,
//! whether it succeeds or fails. Errors are never stored, so every call that
//! arrives after a failed analysis has finished tries again.

mod entry;

pub use entry::{CacheEntry, CacheStats};

use crate::analyzer::Analyze;
use crate::output::AnalysisResult;
use crate::AnalyzerError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

type EntryMap = RwLock<HashMap<String, CacheEntry>>;

type Outcome = Result<AnalysisResult, AnalyzerError>;

/// An analysis in progress that later callers for the same URL wait on
///
/// The slot stays `None` until the leading call publishes its outcome. If the
/// leader goes away without publishing, the sender is dropped and waiters
/// start over.
struct Flight {
    outcome: watch::Sender<Option<Outcome>>,
}

type FlightMap = Mutex<HashMap<String, Arc<Flight>>>;

enum Role {
    Lead(Arc<Flight>),
    Wait(watch::Receiver<Option<Outcome>>),
}

/// Unregisters a flight when its leader finishes or is cancelled
struct Landing<'a> {
    in_flight: &'a FlightMap,
    url: &'a str,
    flight: Arc<Flight>,
}

impl Drop for Landing<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight
            .get(self.url)
            .map_or(false, |current| Arc::ptr_eq(current, &self.flight))
        {
            in_flight.remove(self.url);
        }
    }
}

/// TTL cache in front of an analyzer
///
/// Reads take a shared lock, inserts and the periodic sweep take an
/// exclusive one; no lock is ever held across an `.await`.
pub struct CachedAnalyzer<A> {
    delegate: A,
    ttl: Duration,
    entries: Arc<EntryMap>,
    in_flight: FlightMap,
    hits: AtomicU64,
    misses: AtomicU64,
    sweeper: Option<JoinHandle<()>>,
}

impl<A: Analyze> CachedAnalyzer<A> {
    /// Wraps `delegate` in a cache whose entries live for `ttl`
    ///
    /// Starts a background task that removes expired entries every `ttl`,
    /// so this must be called from within a Tokio runtime. The task stops
    /// when the cache is dropped.
    pub fn new(delegate: A, ttl: Duration) -> Self {
        let entries: Arc<EntryMap> = Arc::default();

        // interval() rejects a zero period; with a zero TTL nothing is ever
        // live, so there is nothing worth sweeping on a timer
        let sweeper = (!ttl.is_zero())
            .then(|| tokio::spawn(sweep_periodically(Arc::clone(&entries), ttl)));

        Self {
            delegate,
            ttl,
            entries,
            in_flight: Mutex::default(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sweeper,
        }
    }

    /// Returns the wrapped analyzer
    pub fn delegate(&self) -> &A {
        &self.delegate
    }

    /// Current hit/miss counters and entry count
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// Number of stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes expired entries now, returning how many were removed
    pub fn sweep_expired(&self) -> usize {
        sweep(&self.entries)
    }

    /// Returns a clone of the live entry for `url`, if any
    fn lookup(&self, url: &str) -> Option<AnalysisResult> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(url)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.result.clone())
    }

    fn store(&self, url: &str, result: AnalysisResult) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(url.to_string(), CacheEntry::new(result, self.ttl));
    }

    /// Joins the in-flight analysis for `url`, or registers a new one
    fn join_or_lead(&self, url: &str) -> Role {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(flight) = in_flight.get(url) {
            return Role::Wait(flight.outcome.subscribe());
        }

        let (outcome, _) = watch::channel(None);
        let flight = Arc::new(Flight { outcome });
        in_flight.insert(url.to_string(), Arc::clone(&flight));
        Role::Lead(flight)
    }

    /// Runs the analysis for a flight this call registered
    async fn lead(&self, url: &str, flight: Arc<Flight>) -> Outcome {
        let landing = Landing {
            in_flight: &self.in_flight,
            url,
            flight,
        };

        // A flight that landed between our lookup and registering may
        // already have stored the result
        let outcome = match self.lookup(url) {
            Some(result) => Ok(result),
            None => {
                let outcome = self.delegate.analyze(url).await;
                match &outcome {
                    Ok(result) => {
                        self.store(url, result.clone());
                        tracing::debug!("Cached result for {} (expires in {:?})", url, self.ttl);
                    }
                    Err(e) => tracing::warn!("Analysis of {} failed, not caching: {}", url, e),
                }
                outcome
            }
        };

        // send_replace stores the value even when nobody is waiting yet
        landing.flight.outcome.send_replace(Some(outcome.clone()));
        outcome
    }
}

#[async_trait]
impl<A: Analyze> Analyze for CachedAnalyzer<A> {
    async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalyzerError> {
        let started = Instant::now();

        if let Some(result) = self.lookup(url) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Cache hit for {} ({:?})", url, started.elapsed());
            return Ok(result);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Cache miss for {}, analyzing", url);

        loop {
            match self.join_or_lead(url) {
                Role::Lead(flight) => return self.lead(url, flight).await,
                Role::Wait(mut published) => {
                    let shared = published
                        .wait_for(Option::is_some)
                        .await
                        .ok()
                        .and_then(|slot| (*slot).clone());

                    match shared {
                        Some(outcome) => return outcome,
                        None => {
                            tracing::debug!("Analysis of {} was abandoned, retrying", url);
                        }
                    }
                }
            }
        }
    }
}

impl<A> Drop for CachedAnalyzer<A> {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

impl<A> std::fmt::Debug for CachedAnalyzer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedAnalyzer")
            .field("ttl", &self.ttl)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

fn sweep(entries: &EntryMap) -> usize {
    let now = Instant::now();
    let mut entries = entries.write().unwrap_or_else(PoisonError::into_inner);
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired_at(now));
    before - entries.len()
}

async fn sweep_periodically(entries: Arc<EntryMap>, period: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let removed = sweep(&entries);
        if removed > 0 {
            tracing::debug!("Swept {} expired cache entries", removed);
        }
    }
}
