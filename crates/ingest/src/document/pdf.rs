use std::panic;

use super::{ExtractionError, PageContent};

/// Collapse a page's text items into one line separated by single spaces.
///
/// The original layout (line breaks, column gaps, kerning spaces) is not
/// reconstructed.
pub(crate) fn flatten_page(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ExtractionError::Decode("PDF decoder panicked".to_string()))?
        .map_err(|e| ExtractionError::Decode(e.to_string()))?;

    let pages: Vec<PageContent> = pages
        .iter()
        .enumerate()
        .map(|(i, raw)| PageContent {
            page_number: i + 1,
            text: flatten_page(raw),
        })
        .collect();

    if pages.iter().all(|p| p.text.is_empty()) {
        tracing::warn!(pages = pages.len(), "PDF decoded but contains no extractable text");
    }

    Ok(pages)
}
