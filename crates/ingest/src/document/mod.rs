mod pdf;

use std::path::Path;

use studyspeak_core::{DocumentText, StudySpeakError};
use thiserror::Error;
use tracing::{debug, info};

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0} (expected application/pdf)")]
    UnsupportedType(String),
    #[error("PDF decode failed: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExtractionError> for StudySpeakError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Io(e) => StudySpeakError::Io(e),
            ExtractionError::Decode(reason) => StudySpeakError::Decode(reason),
            other => StudySpeakError::Other(other.to_string()),
        }
    }
}

/// A page of extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: usize,
    /// Text items of the page joined by single spaces, no newlines.
    pub text: String,
}

/// Result of extracting text from a PDF.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// Every page in document order, including pages without text.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Flatten into the notebook's document text (pages joined by newline).
    pub fn to_document_text(&self) -> DocumentText {
        DocumentText::from_pages(self.pages.iter().map(|p| p.text.as_str()))
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}

/// Guess the MIME type from the file name, as a file picker filter would.
pub fn mime_type_of(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Extract text from PDF bytes. `filename` only gates the MIME type; the
/// bytes themselves decide whether decoding succeeds.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let mime = mime_type_of(filename);
    if mime != PDF_MIME {
        return Err(ExtractionError::UnsupportedType(mime));
    }

    let pages = pdf::extract_pdf(bytes)?;
    Ok(ExtractedDocument {
        filename: filename.to_string(),
        pages,
    })
}

/// Read and decode a PDF from disk.
///
/// Decoding runs on the blocking pool; a decoder panic is reported as
/// [`ExtractionError::Decode`] instead of tearing down the caller.
pub async fn load_document(path: &Path) -> Result<ExtractedDocument, ExtractionError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mime = mime_type_of(&filename);
    if mime != PDF_MIME {
        return Err(ExtractionError::UnsupportedType(mime));
    }

    let bytes = tokio::fs::read(path).await?;
    debug!(file = %filename, bytes = bytes.len(), "Read PDF");

    let doc = tokio::task::spawn_blocking(move || extract_text(&bytes, &filename))
        .await
        .map_err(|e| ExtractionError::Decode(format!("decoder aborted: {e}")))??;

    info!(
        file = %doc.filename,
        pages = doc.pages.len(),
        chars = doc.total_chars(),
        "PDF text extracted"
    );
    Ok(doc)
}
