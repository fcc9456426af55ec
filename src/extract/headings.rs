use crate::document::Document;
use crate::output::HeadingCounts;

/// Counts `h1` through `h6` elements across the whole document
///
/// Every occurrence counts once, however deeply it is nested.
pub fn count_headings(document: &Document) -> HeadingCounts {
    let mut counts = HeadingCounts::default();

    for tag in document.root().descendants().filter_map(|node| node.tag_name()) {
        match tag {
            "h1" => counts.h1 += 1,
            "h2" => counts.h2 += 1,
            "h3" => counts.h3 += 1,
            "h4" => counts.h4 += 1,
            "h5" => counts.h5 += 1,
            "h6" => counts.h6 += 1,
            _ => {}
        }
    }

    counts
}
