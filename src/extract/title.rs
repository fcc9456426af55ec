use crate::document::Document;

/// Extracts the text of the first `<title>` element in document order
///
/// The text is every descendant text node concatenated, so nested elements
/// contribute their text but not their tags. No trimming is applied. A
/// missing title and an empty one both yield an empty string.
pub fn extract_title(document: &Document) -> String {
    document
        .root()
        .find(|node| node.is_element("title"))
        .map(|title| title.text_content())
        .unwrap_or_default()
}
