use crate::document::{Document, Node};

/// Substrings in a form's `action`, `id` or `class` that mark it as a login form
const LOGIN_MARKERS: &[&str] = &["login", "signin"];

/// Form attributes inspected for login markers
const MARKED_ATTRIBUTES: &[&str] = &["action", "id", "class"];

/// Detects whether the document contains a login form
///
/// A `<form>` counts as a login form when its `action`, `id` or `class`
/// contains `login` or `signin` (case-insensitive), or when any `<input>`
/// inside it, at any depth, has `type="password"`. The search stops at the
/// first matching form.
pub fn detect_login_form(document: &Document) -> bool {
    document
        .root()
        .find(|node| node.is_element("form") && is_login_form(node))
        .is_some()
}

fn is_login_form(form: &Node) -> bool {
    has_login_marker(form) || has_password_input(form)
}

fn has_login_marker(form: &Node) -> bool {
    MARKED_ATTRIBUTES.iter().any(|attribute| {
        form.attr(attribute).map_or(false, |value| {
            let value = value.to_lowercase();
            LOGIN_MARKERS.iter().any(|marker| value.contains(marker))
        })
    })
}

fn has_password_input(form: &Node) -> bool {
    form.find(|node| {
        node.is_element("input")
            && node
                .attr("type")
                .map_or(false, |kind| kind.trim().eq_ignore_ascii_case("password"))
    })
    .is_some()
}
