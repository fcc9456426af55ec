//! Web-Analyzer main entry point
//!
//! This is the command-line interface for the Web-Analyzer page inspector.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;
use web_analyzer::api::{AnalysisRequest, ApiBody, ApiResponse, ErrorResponse};
use web_analyzer::config::{load_config, Config};
use web_analyzer::output::print_report;
use web_analyzer::AnalysisService;

/// Web-Analyzer: structural analysis of web pages
///
/// Fetches each URL and reports its HTML version, title, heading counts,
/// link statistics and whether it contains a login form. Links found on
/// the page are probed concurrently to count the inaccessible ones.
#[derive(Parser, Debug)]
#[command(name = "web-analyzer")]
#[command(version)]
#[command(about = "Structural analysis of web pages", long_about = None)]
struct Cli {
    /// URLs to analyze; `https://` is assumed when no scheme is given
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print one JSON response (status and body) per URL instead of a text report
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => read_config(path)?,
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let service = AnalysisService::from_config(&config).context("Failed to set up analyzer")?;

    let responses = analyze_all(&service, &cli.urls).await;

    let mut failed = 0;
    for (url, response) in cli.urls.iter().zip(&responses) {
        if !response.is_success() {
            failed += 1;
        }
        emit(url, response, cli.json)?;
    }

    if let Some(stats) = service.cache_stats() {
        tracing::debug!(
            "Cache: {} hits, {} misses, {} entries",
            stats.hits,
            stats.misses,
            stats.entries
        );
    }

    if failed > 0 {
        anyhow::bail!("{} of {} analyses failed", failed, cli.urls.len());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("web_analyzer=info,warn"),
            1 => EnvFilter::new("web_analyzer=debug,info"),
            2 => EnvFilter::new("web_analyzer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    let config = load_config(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::debug!("Configuration loaded: {:?}", config);
    Ok(config)
}

/// Analyzes every URL concurrently, returning responses in input order
async fn analyze_all(service: &AnalysisService, urls: &[String]) -> Vec<ApiResponse> {
    let mut tasks = JoinSet::new();
    for (index, url) in urls.iter().enumerate() {
        let service = service.clone();
        let request = AnalysisRequest::new(url.clone());
        tasks.spawn(async move { (index, service.handle_analyze(request).await) });
    }

    let mut responses: Vec<Option<ApiResponse>> = vec![None; urls.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, response)) => responses[index] = Some(response),
            Err(e) => tracing::error!("Analysis task failed: {}", e),
        }
    }

    responses
        .into_iter()
        .map(|response| response.unwrap_or_else(task_failure))
        .collect()
}

fn task_failure() -> ApiResponse {
    ApiResponse {
        status: 500,
        body: ApiBody::Error(ErrorResponse {
            status_code: 500,
            message: "Analysis task failed".to_string(),
        }),
    }
}

fn emit(url: &str, response: &ApiResponse, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(response)?);
        return Ok(());
    }

    match response.result() {
        Some(result) => print_report(url, result),
        None => {
            if let ApiBody::Error(error) = &response.body {
                tracing::error!("{}: {}", url, error.message);
            }
        }
    }
    Ok(())
}
