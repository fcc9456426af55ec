//! Plain-text analysis reports

use crate::output::types::AnalysisResult;
use std::fmt::Write;

/// Formats an analysis result as a human-readable report
///
/// # Arguments
///
/// * `url` - The analyzed URL, used as the report heading
/// * `result` - The analysis result
///
/// # Returns
///
/// A multi-line report string ending in a newline
pub fn format_report(url: &str, result: &AnalysisResult) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== {} ===\n", url);
    let _ = writeln!(out, "HTML version: {}", result.html_version);
    let _ = writeln!(out, "Title: {}", display_title(&result.title));
    let _ = writeln!(
        out,
        "Login form: {}",
        if result.contains_login_form { "yes" } else { "no" }
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Headings ({}):", result.headings.total());
    for (level, count) in result.headings.as_array().iter().enumerate() {
        let _ = writeln!(out, "  h{}: {}", level + 1, count);
    }
    let _ = writeln!(out);

    let links = &result.links;
    let _ = writeln!(out, "Links ({}):", links.total());
    let _ = writeln!(out, "  Internal: {}", links.internal);
    let _ = writeln!(out, "  External: {}", links.external);
    let _ = writeln!(out, "  Inaccessible: {}", links.inaccessible);

    out
}

/// Prints an analysis report to stdout
pub fn print_report(url: &str, result: &AnalysisResult) {
    print!("{}", format_report(url, result));
}

fn display_title(title: &str) -> &str {
    if title.trim().is_empty() {
        "(none)"
    } else {
        title
    }
}
