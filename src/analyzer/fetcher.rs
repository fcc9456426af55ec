//! HTTP fetching for analyzed pages
//!
//! This module handles the requests made for the page itself:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests for the page body
//! - Status validation (only `200 OK` is analyzed)
//! - Error classification

use crate::config::AnalyzerConfig;
use crate::{AnalyzerError, ParseError};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Builds the client used to fetch analyzed pages
///
/// Redirects are not followed: a page that answers with a redirect is
/// reported as an upstream status error, not analyzed at its new location.
///
/// # Example
///
/// ```no_run
/// use web_analyzer::analyzer::build_page_client;
/// use web_analyzer::config::AnalyzerConfig;
///
/// let client = build_page_client(&AnalyzerConfig::default()).unwrap();
/// ```
pub fn build_page_client(config: &AnalyzerConfig) -> Result<Client, reqwest::Error> {
    build_client(&config.user_agent, config.fetch_timeout())
}

/// Builds the client used for link accessibility probes
///
/// Same policy as the page client but with the much shorter probe timeout.
pub fn build_probe_client(config: &AnalyzerConfig) -> Result<Client, reqwest::Error> {
    build_client(&config.user_agent, config.probe_timeout())
}

fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body
///
/// # Request Flow
///
/// 1. Send a GET request; transport failures → `Fetch`
/// 2. Require status `200`; anything else → `UpstreamStatus`
/// 3. Refuse bodies whose declared length exceeds `max_bytes` → `Parse`
/// 4. Stream the body, stopping as soon as it grows past `max_bytes` → `Parse`;
///    read failures → `Fetch`
/// 5. Decode as UTF-8, replacing invalid sequences
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `max_bytes` - Largest body that will be parsed later
pub async fn fetch_page(client: &Client, url: &str, max_bytes: usize) -> Result<String, AnalyzerError> {
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AnalyzerError::Fetch(describe_transport_error(&e)))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(AnalyzerError::UpstreamStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        });
    }

    if let Some(length) = response.content_length() {
        let length = usize::try_from(length).unwrap_or(usize::MAX);
        if length > max_bytes {
            return Err(ParseError::TooLarge {
                size: length,
                limit: max_bytes,
            }
            .into());
        }
    }

    // Chunked and compressed responses carry no usable length, so the
    // limit is enforced on the decoded bytes as they arrive
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| AnalyzerError::Fetch(describe_transport_error(&e)))?
    {
        let size = body.len() + chunk.len();
        if size > max_bytes {
            tracing::debug!("Body of {} passed {} bytes, giving up", url, max_bytes);
            return Err(ParseError::TooLarge {
                size,
                limit: max_bytes,
            }
            .into());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Turns a transport error into a message for the caller
pub(crate) fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timeout: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
