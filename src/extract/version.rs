use crate::document::{Document, Node};

/// Elements introduced by HTML5, used when a page has no doctype
const HTML5_ELEMENTS: &[&str] = &[
    "article", "aside", "audio", "canvas", "footer", "header", "nav", "section", "video",
];

/// Detects the markup version of a document
///
/// # Detection Rules
///
/// The first doctype among the document root's children counts, so a
/// leading comment or `<?xml ...?>` prologue does not hide it.
///
/// | Doctype | Result |
/// |---------|--------|
/// | name `html`, no public or system id | `HTML5` |
/// | public id contains `html 4` | `HTML 4.01` |
/// | public id contains `xhtml 1.0` | `XHTML 1.0` |
/// | public id contains `xhtml 1.1` | `XHTML 1.1` |
/// | anything else | `Unknown DOCTYPE` |
/// | none, HTML5 elements present | `HTML5 (No DOCTYPE)` |
/// | none | `Unknown (No DOCTYPE)` |
///
/// Matching is case-insensitive.
pub fn detect_html_version(document: &Document) -> String {
    let doctype = document.root().children().iter().find_map(|child| match child {
        Node::Doctype {
            name,
            public_id,
            system_id,
        } => Some((name, public_id, system_id)),
        _ => None,
    });

    if let Some((name, public_id, system_id)) = doctype {
        return doctype_label(name, public_id, system_id).to_string();
    }

    let has_html5_element = document
        .root()
        .find(|node| {
            node.tag_name()
                .map_or(false, |tag| HTML5_ELEMENTS.contains(&tag))
        })
        .is_some();

    if has_html5_element {
        "HTML5 (No DOCTYPE)".to_string()
    } else {
        "Unknown (No DOCTYPE)".to_string()
    }
}

fn doctype_label(name: &str, public_id: &str, system_id: &str) -> &'static str {
    if name.eq_ignore_ascii_case("html") && public_id.is_empty() && system_id.is_empty() {
        return "HTML5";
    }

    let public_id = public_id.to_lowercase();
    if public_id.contains("html 4") {
        "HTML 4.01"
    } else if public_id.contains("xhtml 1.0") {
        "XHTML 1.0"
    } else if public_id.contains("xhtml 1.1") {
        "XHTML 1.1"
    } else {
        "Unknown DOCTYPE"
    }
}
