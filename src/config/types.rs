use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Web-Analyzer
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub cache: CacheConfig,
}

/// Fetching and probing configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalyzerConfig {
    /// Timeout for fetching the analyzed page (seconds)
    pub fetch_timeout_secs: u64,

    /// Timeout for each link accessibility probe (seconds)
    pub probe_timeout_secs: u64,

    /// Largest response body that will be parsed
    pub max_document_bytes: usize,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl AnalyzerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            probe_timeout_secs: 3,
            max_document_bytes: 10 * 1024 * 1024,
            user_agent: format!("web-analyzer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Result cache configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Whether analysis results are memoized at all
    pub enabled: bool,

    /// How long a cached result stays live (seconds); also the sweep period
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 15 * 60,
        }
    }
}
