//! Substring lookup over the loaded document.
//!
//! No ranking or stemming: a case-insensitive containment test on the whole
//! text, then a first-match scan over `. `-delimited segments.

use studyspeak_core::DocumentText;

/// Literal delimiter used to cut the document into segments.
pub const SEGMENT_DELIMITER: &str = ". ";

/// Result of a local lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// First segment containing the query, verbatim.
    Snippet(&'a str),
    /// The query occurs in the document but spans a segment boundary.
    Unclear,
    /// The query does not occur anywhere in the document.
    Miss,
}

/// Look `query` up in `document`.
pub fn search<'a>(document: &'a DocumentText, query: &str) -> SearchOutcome<'a> {
    let needle = query.to_lowercase();
    let haystack = document.as_str();

    if !haystack.to_lowercase().contains(&needle) {
        return SearchOutcome::Miss;
    }

    haystack
        .split(SEGMENT_DELIMITER)
        .find(|segment| segment.to_lowercase().contains(&needle))
        .map(SearchOutcome::Snippet)
        .unwrap_or(SearchOutcome::Unclear)
}
