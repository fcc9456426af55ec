//! Web-Analyzer: structural analysis of a single web page
//!
//! This crate fetches a page by URL, parses its markup and reports the
//! detected HTML version, title, heading counts, link statistics and whether
//! the page contains a login form. Every link on the page is probed
//! concurrently for accessibility, and results are memoized in a TTL cache.

pub mod analyzer;
pub mod api;
pub mod cache;
pub mod config;
pub mod document;
pub mod extract;
pub mod output;
pub mod url;

use std::sync::Arc;
use thiserror::Error;

/// Errors produced while analyzing a page
///
/// Every variant is terminal for the analysis that produced it: nothing is
/// retried and nothing is cached. Errors are `Clone` so one failed analysis
/// can be handed to every caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum AnalyzerError {
    #[error("failed to fetch URL: {0}")]
    Fetch(String),

    #[error("HTTP error: {status} {reason}")]
    UpstreamStatus { status: u16, reason: String },

    #[error("failed to parse HTML: {0}")]
    Parse(#[from] ParseError),

    #[error("failed to parse base URL: {0}")]
    InvalidUrl(#[from] ::url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] Arc<reqwest::Error>),
}

/// Document parsing errors
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("document is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors in a caller-supplied URL
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("URL is required")]
    Missing,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analyzer::{Analyze, Analyzer};
pub use api::AnalysisService;
pub use cache::CachedAnalyzer;
pub use config::Config;
pub use document::Document;
pub use output::{AnalysisResult, HeadingCounts, LinkStats};
pub use url::normalize_request_url;
