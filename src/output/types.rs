use serde::{Deserialize, Serialize};

/// Everything an analysis reports about one page
///
/// Produced once by the analyzer and never mutated afterwards; the cache
/// hands out clones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Detected markup version label
    pub html_version: String,

    /// Text of the first `<title>` element, empty if there is none
    pub title: String,

    /// Heading element counts
    pub headings: HeadingCounts,

    /// Link classification and accessibility counts
    pub links: LinkStats,

    /// Whether a login form was found
    pub contains_login_form: bool,
}

/// Number of `h1`..`h6` elements in a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCounts {
    pub h1: u32,
    pub h2: u32,
    pub h3: u32,
    pub h4: u32,
    pub h5: u32,
    pub h6: u32,
}

impl HeadingCounts {
    /// Counts for levels 1 through 6, in order
    pub fn as_array(&self) -> [u32; 6] {
        [self.h1, self.h2, self.h3, self.h4, self.h5, self.h6]
    }

    /// Total number of headings of any level
    pub fn total(&self) -> u32 {
        self.as_array().iter().sum()
    }
}

/// Link counts for a page
///
/// `inaccessible` is a tally over probed links and overlaps the other two:
/// a broken internal link counts as both internal and inaccessible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub internal: u32,
    pub external: u32,
    pub inaccessible: u32,
}

impl LinkStats {
    /// Number of links that were counted
    pub fn total(&self) -> u32 {
        self.internal + self.external
    }
}
