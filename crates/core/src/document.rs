use serde::{Deserialize, Serialize};

/// Answer used when the query occurs in the document but straddles a
/// sentence boundary, so no single segment contains it.
pub const UNCLEAR_MATCH_ANSWER: &str = "Found in PDF but couldn't extract clearly.";

/// Answer used when the completion response lacks `choices[0].message.content`.
pub const NO_COMPLETION_ANSWER: &str = "No answer from GPT.";

/// Answer used when the completion request fails outright.
pub const FETCH_ERROR_ANSWER: &str = "Error fetching from GPT.";

/// Flattened text of the most recently loaded PDF.
///
/// Pages are joined by `\n`, text items within a page by a single space.
/// The default value means nothing has been loaded; a loaded document has
/// at least one page even when every page is blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText {
    text: String,
    pages: usize,
}

impl DocumentText {
    /// Join per-page strings in page order.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pages: Vec<String> = pages.into_iter().map(|p| p.as_ref().to_string()).collect();
        Self {
            text: pages.join("\n"),
            pages: pages.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether a PDF has been loaded, blank or not.
    pub fn is_loaded(&self) -> bool {
        self.pages > 0
    }

    /// Number of pages the text was built from (0 before the first load).
    pub fn page_count(&self) -> usize {
        self.pages
    }
}

/// Treats `text` as already joined pages, one per `\n`-separated line.
impl From<String> for DocumentText {
    fn from(text: String) -> Self {
        let pages = text.split('\n').count();
        Self { text, pages }
    }
}

impl From<&str> for DocumentText {
    fn from(text: &str) -> Self {
        Self::from(text.to_string())
    }
}

/// Where the answer of a conversation entry came from.
///
/// The rendered log does not distinguish these; the tag is kept so callers
/// can tell a genuine answer from a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// A `. `-delimited segment of the document.
    Document,
    /// Matched the document as a whole, but no single segment.
    DocumentUnclear,
    /// Completion text from the remote model.
    Model,
    /// Remote response had no completion content.
    ModelEmpty,
    /// Remote request failed.
    ModelError,
}

impl AnswerSource {
    pub fn is_placeholder(self) -> bool {
        matches!(
            self,
            AnswerSource::DocumentUnclear | AnswerSource::ModelEmpty | AnswerSource::ModelError
        )
    }
}

/// One completed ask cycle. Never mutated after it is appended to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub question: String,
    pub answer: String,
    pub source: AnswerSource,
}
