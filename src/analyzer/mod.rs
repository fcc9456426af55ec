//! Analyzer module: fetching, extraction and link probing for one page
//!
//! This module contains the analysis pipeline, including:
//! - HTTP fetching with status validation
//! - Parsing into the document model
//! - Running the structural extractors
//! - Concurrent link accessibility probing

mod fetcher;
mod prober;

pub use fetcher::{build_page_client, build_probe_client, fetch_page};
pub use prober::{is_accessible_status, HttpProbe, LinkProber, Probe};

use crate::config::AnalyzerConfig;
use crate::document::Document;
use crate::extract::extract_page_facts;
use crate::output::AnalysisResult;
use crate::url::page_host;
use crate::AnalyzerError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;

/// Anything that can turn a URL into an [`AnalysisResult`]
///
/// Implemented by [`Analyzer`] and by the caching wrapper in
/// [`crate::cache`], so callers can stack them freely.
#[async_trait]
pub trait Analyze: Send + Sync {
    async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalyzerError>;
}

#[async_trait]
impl<T: Analyze + ?Sized> Analyze for Arc<T> {
    async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalyzerError> {
        (**self).analyze(url).await
    }
}

/// Analyzes pages fetched over HTTP
///
/// Holds one client for page fetches and one, with a much shorter timeout,
/// for link probes. Both are reused across analyses.
#[derive(Debug, Clone)]
pub struct Analyzer {
    client: Client,
    prober: LinkProber,
    max_document_bytes: usize,
}

impl Analyzer {
    /// Creates an analyzer that probes links over HTTP
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let probe_client = build_probe_client(config).map_err(|e| AnalyzerError::Client(Arc::new(e)))?;
        Self::with_probe(config, Arc::new(HttpProbe::new(probe_client)))
    }

    /// Creates an analyzer with a custom link probe
    pub fn with_probe(config: &AnalyzerConfig, probe: Arc<dyn Probe>) -> Result<Self, AnalyzerError> {
        let client = build_page_client(config).map_err(|e| AnalyzerError::Client(Arc::new(e)))?;

        Ok(Self {
            client,
            prober: LinkProber::new(probe, config.probe_timeout()),
            max_document_bytes: config.max_document_bytes,
        })
    }
}

#[async_trait]
impl Analyze for Analyzer {
    /// Runs a complete analysis of the page at `url`
    ///
    /// 1. Fetch the page (status must be `200`)
    /// 2. Parse the body into a [`Document`]
    /// 3. Determine the page host from `url`
    /// 4. Run the structural extractors
    /// 5. Probe links and fold in the counts
    ///
    /// Any failure in steps 1–3 aborts the analysis; no partial result is
    /// ever returned.
    async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalyzerError> {
        let started = Instant::now();
        tracing::debug!("Analyzing {}", url);

        let body = fetch_page(&self.client, url, self.max_document_bytes).await?;

        let facts = {
            let document = Document::parse_with_limit(&body, self.max_document_bytes)?;
            let host = page_host(url)?;
            extract_page_facts(&document, &host)
        };
        drop(body);

        let links = self.prober.probe_all(&facts.links).await;

        let result = AnalysisResult {
            html_version: facts.html_version,
            title: facts.title,
            headings: facts.headings,
            links,
            contains_login_form: facts.contains_login_form,
        };

        tracing::info!(
            "Analyzed {} in {:?}: {}, {} headings, {} links ({} inaccessible)",
            url,
            started.elapsed(),
            result.html_version,
            result.headings.total(),
            result.links.total(),
            result.links.inaccessible
        );

        Ok(result)
    }
}
