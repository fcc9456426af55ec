//! Configuration module for Web-Analyzer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration.
//!
//! # Example
//!
//! ```no_run
//! use web_analyzer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("analyzer.toml")).unwrap();
//! println!("Probe timeout: {}s", config.analyzer.probe_timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnalyzerConfig, CacheConfig, Config};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
