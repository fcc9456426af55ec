//! URL handling module for Web-Analyzer
//!
//! This module normalizes caller-supplied URLs before analysis and extracts
//! the host used to tell internal links from external ones.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{host_of, page_host};
pub use normalize::normalize_request_url;
