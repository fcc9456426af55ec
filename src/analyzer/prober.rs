//! Concurrent link accessibility probing
//!
//! Every link that needs a network check gets its own task. Tasks never
//! share counters: each returns its own verdict and a single reader folds
//! the verdicts into [`LinkStats`] once all of them have finished.

use crate::analyzer::fetcher::describe_transport_error;
use crate::extract::{ClassifiedLink, LinkKind};
use crate::output::LinkStats;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// A reachability check for a single URL
#[async_trait]
pub trait Probe: Send + Sync {
    /// Returns true if the URL answered with a 2xx or 3xx status
    async fn is_accessible(&self, url: &str) -> bool;
}

/// Probes links with `HEAD` requests
///
/// The client must not follow redirects: a `301` is itself a successful
/// answer. Use [`build_probe_client`](crate::analyzer::build_probe_client).
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn is_accessible(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                tracing::trace!("Probe {} -> {}", url, status);
                is_accessible_status(status)
            }
            Err(e) => {
                tracing::debug!("Probe {} failed: {}", url, describe_transport_error(&e));
                false
            }
        }
    }
}

/// Returns true for statuses in `[200, 400)`
pub fn is_accessible_status(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Fans probes out over a page's links and aggregates the counts
#[derive(Clone)]
pub struct LinkProber {
    probe: Arc<dyn Probe>,
    timeout: Duration,
}

impl LinkProber {
    /// Creates a prober
    ///
    /// # Arguments
    ///
    /// * `probe` - The reachability check to run per link
    /// * `timeout` - Upper bound for a single probe; a probe that takes
    ///   longer counts as inaccessible
    pub fn new(probe: Arc<dyn Probe>, timeout: Duration) -> Self {
        Self { probe, timeout }
    }

    /// Counts internal, external and inaccessible links
    ///
    /// Internal/external counts come straight from the classification. Each
    /// link whose href starts with `http` is probed in its own task, with no
    /// limit on how many run at once; fragment links are accessible without
    /// a request and other links are never probed. Returns only after every
    /// probe has finished.
    pub async fn probe_all(&self, links: &[ClassifiedLink]) -> LinkStats {
        let mut stats = LinkStats::default();
        let mut probes = JoinSet::new();

        for link in links {
            match link.kind {
                LinkKind::Internal => stats.internal += 1,
                LinkKind::External => stats.external += 1,
            }

            if link.is_fragment() || !link.needs_probe() {
                continue;
            }

            let probe = Arc::clone(&self.probe);
            let timeout = self.timeout;
            let url = link.href.trim().to_string();
            probes.spawn(async move {
                match tokio::time::timeout(timeout, probe.is_accessible(&url)).await {
                    Ok(accessible) => accessible,
                    Err(_) => {
                        tracing::debug!("Probe {} timed out after {:?}", url, timeout);
                        false
                    }
                }
            });
        }

        let probed = probes.len();
        while let Some(joined) = probes.join_next().await {
            let accessible = joined.unwrap_or_else(|e| {
                tracing::warn!("Probe task failed: {}", e);
                false
            });
            if !accessible {
                stats.inaccessible += 1;
            }
        }

        tracing::debug!(
            "Probed {} of {} links, {} inaccessible",
            probed,
            links.len(),
            stats.inaccessible
        );

        stats
    }
}

impl std::fmt::Debug for LinkProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkProber")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Outcome a stubbed probe produces for one URL
    #[derive(Clone, Copy)]
    enum Outcome {
        Status(u16),
        Hang,
        Panic,
    }

    struct StubProbe {
        outcomes: HashMap<String, Outcome>,
        calls: AtomicUsize,
    }

    impl StubProbe {
        fn new(outcomes: Vec<(String, Outcome)>) -> Self {
            Self {
                outcomes: outcomes.into_iter().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Probe for StubProbe {
        async fn is_accessible(&self, url: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Yield so that tasks interleave
            tokio::task::yield_now().await;
            match self.outcomes.get(url).copied().unwrap_or(Outcome::Status(200)) {
                Outcome::Status(status) => is_accessible_status(status),
                Outcome::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    true
                }
                Outcome::Panic => panic!("probe blew up"),
            }
        }
    }

    fn link(href: &str, kind: LinkKind) -> ClassifiedLink {
        ClassifiedLink {
            href: href.to_string(),
            kind,
        }
    }

    #[test]
    fn test_accessible_status_range() {
        assert!(!is_accessible_status(199));
        assert!(is_accessible_status(200));
        assert!(is_accessible_status(204));
        assert!(is_accessible_status(301));
        assert!(is_accessible_status(399));
        assert!(!is_accessible_status(400));
        assert!(!is_accessible_status(404));
        assert!(!is_accessible_status(503));
    }

    #[tokio::test]
    async fn test_no_links() {
        let prober = LinkProber::new(
            Arc::new(StubProbe::new(vec![])),
            Duration::from_secs(3),
        );
        assert_eq!(prober.probe_all(&[]).await, LinkStats::default());
    }

    #[tokio::test]
    async fn test_only_http_links_are_probed() {
        let stub = Arc::new(StubProbe::new(vec![]));
        let prober = LinkProber::new(stub.clone(), Duration::from_secs(3));

        let links = vec![
            link("/relative", LinkKind::Internal),
            link("#top", LinkKind::Internal),
            link("mailto:x@example.com", LinkKind::External),
            link("https://example.com/a", LinkKind::Internal),
            link("https://other.com/b", LinkKind::External),
        ];

        let stats = prober.probe_all(&links).await;
        assert_eq!(stats.internal, 3);
        assert_eq!(stats.external, 2);
        assert_eq!(stats.inaccessible, 0);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_padded_http_link_uses_trimmed_url() {
        let stub = Arc::new(StubProbe::new(vec![(
            "https://gone.com/".to_string(),
            Outcome::Status(404),
        )]));
        let prober = LinkProber::new(stub.clone(), Duration::from_secs(3));

        let stats = prober
            .probe_all(&[link(" https://gone.com/ ", LinkKind::External)])
            .await;

        assert_eq!(stats.external, 1);
        assert_eq!(stats.inaccessible, 1);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_probe_times_out_without_blocking_others() {
        let stub = Arc::new(StubProbe::new(vec![
            ("https://slow.com/".to_string(), Outcome::Hang),
            ("https://gone.com/".to_string(), Outcome::Status(404)),
        ]));
        let prober = LinkProber::new(stub.clone(), Duration::from_secs(3));

        let links = vec![
            link("https://slow.com/", LinkKind::External),
            link("https://gone.com/", LinkKind::External),
            link("https://fine.com/", LinkKind::External),
        ];

        let started = tokio::time::Instant::now();
        let stats = prober.probe_all(&links).await;

        assert_eq!(stats.external, 3);
        assert_eq!(stats.inaccessible, 2);
        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_panicking_probe_counts_as_inaccessible() {
        let stub = Arc::new(StubProbe::new(vec![(
            "https://boom.com/".to_string(),
            Outcome::Panic,
        )]));
        let prober = LinkProber::new(stub, Duration::from_secs(3));

        let links = vec![
            link("https://boom.com/", LinkKind::External),
            link("https://ok.com/", LinkKind::External),
        ];

        let stats = prober.probe_all(&links).await;
        assert_eq!(stats.external, 2);
        assert_eq!(stats.inaccessible, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_counts_are_exact_under_concurrency() {
        // 3 outcomes x 100 links each, on several worker threads
        let mut outcomes = Vec::new();
        let mut links = Vec::new();
        for i in 0..300 {
            let url = format!("https://site{}.com/page", i);
            let outcome = match i % 3 {
                0 => Outcome::Status(200),
                1 => Outcome::Status(404),
                _ => Outcome::Hang,
            };
            let kind = if i % 2 == 0 {
                LinkKind::Internal
            } else {
                LinkKind::External
            };
            outcomes.push((url.clone(), outcome));
            links.push(link(&url, kind));
        }

        let prober = LinkProber::new(
            Arc::new(StubProbe::new(outcomes)),
            Duration::from_millis(50),
        );

        for _ in 0..20 {
            let stats = prober.probe_all(&links).await;
            assert_eq!(stats.internal, 150);
            assert_eq!(stats.external, 150);
            assert_eq!(stats.inaccessible, 200);
        }
    }
}
