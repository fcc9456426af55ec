use crate::UrlError;
use url::Url;

/// Normalizes a caller-supplied URL before it is analyzed
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject if nothing is left
/// 2. Prefix `https://` unless the URL already starts with `http://` or `https://`
/// 3. Parse the result; reject if malformed or if it has no host
///
/// The returned string is the prefixed input, not the parser's serialization,
/// so `http://x.com` and `http://x.com/` stay distinct.
///
/// # Arguments
///
/// * `raw` - The URL exactly as the caller supplied it
///
/// # Returns
///
/// * `Ok(String)` - The URL to analyze
/// * `Err(UrlError)` - The URL was missing or malformed
///
/// # Examples
///
/// ```
/// use web_analyzer::url::normalize_request_url;
///
/// assert_eq!(normalize_request_url("example.com").unwrap(), "https://example.com");
/// assert_eq!(normalize_request_url("http://example.com/").unwrap(), "http://example.com/");
/// ```
pub fn normalize_request_url(raw: &str) -> Result<String, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Missing);
    }

    let candidate = if has_http_prefix(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate).map_err(|e| UrlError::InvalidFormat(e.to_string()))?;

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::InvalidFormat("missing host".to_string()));
    }

    Ok(candidate)
}

fn has_http_prefix(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
