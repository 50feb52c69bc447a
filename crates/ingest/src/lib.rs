//! Document ingestion for the study notebook.
//!
//! - [`document`] turns a PDF file into flattened [`DocumentText`](studyspeak_core::DocumentText)
//! - [`search`] answers a question from that text with a substring scan

pub mod document;
pub mod search;

pub use document::{extract_text, load_document, ExtractedDocument, ExtractionError, PageContent};
pub use search::{search, SearchOutcome};
