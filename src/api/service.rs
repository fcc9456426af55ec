use super::types::{AnalysisRequest, ApiError, ApiResponse, HealthResponse};
use crate::analyzer::{Analyze, Analyzer};
use crate::cache::{CacheStats, CachedAnalyzer};
use crate::config::Config;
use crate::output::AnalysisResult;
use crate::url::normalize_request_url;
use crate::AnalyzerError;
use std::sync::Arc;

/// Validates incoming requests and dispatches them to an analyzer
#[derive(Clone)]
pub struct AnalysisService {
    analyzer: Arc<dyn Analyze>,
    cache: Option<Arc<CachedAnalyzer<Analyzer>>>,
}

impl AnalysisService {
    /// Creates a service in front of any analyzer
    pub fn new(analyzer: Arc<dyn Analyze>) -> Self {
        Self {
            analyzer,
            cache: None,
        }
    }

    /// Builds the analyzer described by `config`
    ///
    /// When caching is enabled the analyzer is wrapped in a
    /// [`CachedAnalyzer`], which spawns its sweeper task, so this must run
    /// inside a Tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self, AnalyzerError> {
        let analyzer = Analyzer::new(&config.analyzer)?;

        if !config.cache.enabled {
            tracing::debug!("Result cache disabled");
            return Ok(Self::new(Arc::new(analyzer)));
        }

        let cache = Arc::new(CachedAnalyzer::new(analyzer, config.cache.ttl()));
        tracing::debug!("Result cache enabled, TTL {:?}", config.cache.ttl());

        Ok(Self {
            analyzer: Arc::clone(&cache) as Arc<dyn Analyze>,
            cache: Some(cache),
        })
    }

    /// Normalizes `raw_url` and analyzes it
    ///
    /// # Errors
    ///
    /// * [`ApiError::BadRequest`] if the URL is missing or malformed; the
    ///   analyzer is not called
    /// * [`ApiError::BadGateway`] if the analysis itself fails
    pub async fn analyze(&self, raw_url: &str) -> Result<AnalysisResult, ApiError> {
        let url = normalize_request_url(raw_url)?;
        let result = self.analyzer.analyze(&url).await?;
        Ok(result)
    }

    /// Handles an "analyze a URL" request
    pub async fn handle_analyze(&self, request: AnalysisRequest) -> ApiResponse {
        match self.analyze(&request.url).await {
            Ok(result) => ApiResponse::ok(result),
            Err(e) => {
                log_failure(&request.url, &e);
                ApiResponse::from(e)
            }
        }
    }

    /// Handles a request whose body is still raw JSON
    pub async fn handle_analyze_json(&self, body: &str) -> ApiResponse {
        match serde_json::from_str::<AnalysisRequest>(body) {
            Ok(request) => self.handle_analyze(request).await,
            Err(e) => {
                let error = ApiError::from(e);
                tracing::debug!("Rejected request body: {}", error);
                ApiResponse::from(error)
            }
        }
    }

    /// Liveness check; always reports `ok`
    pub fn health(&self) -> HealthResponse {
        HealthResponse::ok()
    }

    /// Hit/miss counters of the result cache, if one is configured
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }
}

fn log_failure(url: &str, error: &ApiError) {
    match error {
        ApiError::BadGateway(_) => tracing::warn!("Analysis of {} failed: {}", url, error),
        _ => tracing::debug!("Rejected request for {:?}: {}", url, error),
    }
}

impl std::fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
