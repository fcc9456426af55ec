use url::Url;

/// Returns the authority host of a URL: the lowercase host plus the port when
/// one is given explicitly and differs from the scheme default
///
/// URLs without a host (such as `mailto:` or `data:`) yield an empty string.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use web_analyzer::url::host_of;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(host_of(&url), "example.com");
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_of(&url), "127.0.0.1:8080");
/// ```
pub fn host_of(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host.to_lowercase(), port),
        (Some(host), None) => host.to_lowercase(),
        (None, _) => String::new(),
    }
}

/// Parses the analyzed page's URL and returns its host
///
/// # Returns
///
/// * `Ok(String)` - The page host, see [`host_of`]
/// * `Err(url::ParseError)` - The URL could not be parsed
pub fn page_host(page_url: &str) -> Result<String, url::ParseError> {
    Url::parse(page_url).map(|url| host_of(&url))
}
