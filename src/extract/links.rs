//! Link extraction and internal/external classification

use crate::document::Document;
use crate::url::host_of;
use url::Url;

/// Whether a link stays on the analyzed page's host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Internal,
    External,
}

/// A countable link and its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLink {
    /// The href as written in the document, without surrounding whitespace
    pub href: String,

    /// Internal or external relative to the page host
    pub kind: LinkKind,
}

impl ClassifiedLink {
    /// Returns true if the link has to be probed over the network
    ///
    /// Only hrefs that start with `http` are probed; relative and
    /// non-HTTP links never are.
    pub fn needs_probe(&self) -> bool {
        self.href.trim().starts_with("http")
    }

    /// Returns true for same-page fragment links such as `#top`
    pub fn is_fragment(&self) -> bool {
        self.href.trim().starts_with('#')
    }
}

/// Collects the `href` of every `<a>` element in document order
///
/// Duplicates are kept; anchors without an `href` are skipped.
pub fn extract_hrefs(document: &Document) -> Vec<&str> {
    document
        .root()
        .descendants()
        .filter(|node| node.is_element("a"))
        .filter_map(|node| node.attr("href"))
        .collect()
}

/// Returns true if a link takes part in link counting at all
///
/// Empty hrefs and `javascript:` pseudo-links are excluded from every count.
pub fn is_countable_link(href: &str) -> bool {
    let href = href.trim();
    !href.is_empty() && !starts_with_ignore_case(href, "javascript:")
}

/// Decides whether a link points at the page's own host
///
/// # Classification Rules
///
/// **Internal:**
/// - empty hrefs and same-page fragments (`#...`)
/// - paths starting with `/`, `./` or `../`
/// - `http`/`https` URLs whose host (and port) equals `host`
/// - relative references without a scheme, such as `page.html`
///
/// **External:**
/// - `http`/`https` URLs on any other host
/// - any other explicit scheme (`mailto:`, `ftp:`, ...), whatever its host
/// - hrefs that fail to parse
///
/// # Examples
///
/// ```
/// use web_analyzer::extract::is_internal_link;
///
/// assert!(is_internal_link("https://example.com/x", "example.com"));
/// assert!(is_internal_link("/x", "example.com"));
/// assert!(!is_internal_link("https://other.com/x", "example.com"));
/// assert!(!is_internal_link("mailto:me@example.com", "example.com"));
/// ```
pub fn is_internal_link(href: &str, host: &str) -> bool {
    let href = href.trim();

    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with('/')
        || href.starts_with("./")
        || href.starts_with("../")
    {
        return true;
    }

    match Url::parse(href) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                return false;
            }
            let link_host = host_of(&url);
            link_host.is_empty() || link_host.eq_ignore_ascii_case(host)
        }
        // No scheme at all: resolved against the page, so same host
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(e) => {
            tracing::trace!("Treating unparseable href {:?} as external: {}", href, e);
            false
        }
    }
}

/// Classifies a single link
pub fn classify_link(href: &str, host: &str) -> LinkKind {
    if is_internal_link(href, host) {
        LinkKind::Internal
    } else {
        LinkKind::External
    }
}

/// Classifies every countable link, dropping the rest
///
/// # Arguments
///
/// * `hrefs` - Raw hrefs in document order
/// * `host` - Host of the analyzed page
pub fn classify_links<'a, I>(hrefs: I, host: &str) -> Vec<ClassifiedLink>
where
    I: IntoIterator<Item = &'a str>,
{
    hrefs
        .into_iter()
        .filter(|href| is_countable_link(href))
        .map(|href| ClassifiedLink {
            href: href.trim().to_string(),
            kind: classify_link(href, host),
        })
        .collect()
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}
