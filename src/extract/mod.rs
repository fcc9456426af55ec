//! Structural extractors
//!
//! Pure, synchronous functions over a [`Document`]. None of them can fail:
//! missing elements and attributes are ordinary cases with defined results.

mod headings;
mod links;
mod login;
mod title;
mod version;

pub use headings::count_headings;
pub use links::{
    classify_link, classify_links, extract_hrefs, is_countable_link, is_internal_link,
    ClassifiedLink, LinkKind,
};
pub use login::detect_login_form;
pub use title::extract_title;
pub use version::detect_html_version;

use crate::document::Document;
use crate::output::HeadingCounts;

/// Facts extracted from a document before any link is probed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFacts {
    pub html_version: String,
    pub title: String,
    pub headings: HeadingCounts,
    pub links: Vec<ClassifiedLink>,
    pub contains_login_form: bool,
}

/// Runs every extractor over a document
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `host` - Host of the page, used to classify links
pub fn extract_page_facts(document: &Document, host: &str) -> PageFacts {
    PageFacts {
        html_version: detect_html_version(document),
        title: extract_title(document),
        headings: count_headings(document),
        links: classify_links(extract_hrefs(document), host),
        contains_login_form: detect_login_form(document),
    }
}
