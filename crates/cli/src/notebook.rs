//! Interaction controller: owns the notebook state and runs ask cycles.
//!
//! State changes go through [`NotebookState::reduce`], a pure transition
//! function; [`Notebook`] performs the I/O (PDF decode, remote fetch,
//! speech) around it.

use std::path::Path;
use std::sync::Arc;

use studyspeak_core::{
    AnswerSource, ConversationEntry, DocumentText, StudySpeakError, UNCLEAR_MATCH_ANSWER,
};
use studyspeak_ingest::{load_document, search, ExtractedDocument, SearchOutcome};
use studyspeak_llm::AnswerFetcher;
use studyspeak_speech::{Announcer, SpeechHandle};
use tracing::{error, info};

/// Everything the user sees: the loaded text, the draft question, the log
/// and whether an ask cycle is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotebookState {
    document: DocumentText,
    draft: String,
    log: Vec<ConversationEntry>,
    busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The draft question changed.
    EditDraft(String),
    /// A PDF finished extracting; replaces any previous document.
    DocumentLoaded(DocumentText),
    /// An ask cycle begins. Ignored while busy or when the draft is blank.
    AskStarted,
    /// An ask cycle produced its answer.
    AskFinished(ConversationEntry),
}

impl NotebookState {
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::EditDraft(text) => self.draft = text,
            Action::DocumentLoaded(document) => self.document = document,
            Action::AskStarted => {
                if self.can_ask() {
                    self.busy = true;
                }
            }
            Action::AskFinished(entry) => {
                self.log.push(entry);
                self.draft.clear();
                self.busy = false;
            }
        }
        self
    }

    /// Whether the ask action is enabled.
    pub fn can_ask(&self) -> bool {
        !self.busy && !self.draft.trim().is_empty()
    }

    pub fn document(&self) -> &DocumentText {
        &self.document
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Completed entries, oldest first.
    pub fn log(&self) -> &[ConversationEntry] {
        &self.log
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}

/// Summary shown after a PDF loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub filename: String,
    pub pages: usize,
    pub chars: usize,
}

/// A finished ask cycle. `speech` may be awaited or dropped.
#[derive(Debug)]
pub struct AskCycle {
    pub entry: ConversationEntry,
    pub speech: SpeechHandle,
}

pub struct Notebook {
    state: NotebookState,
    fetcher: AnswerFetcher,
    announcer: Arc<dyn Announcer>,
    locale: String,
}

impl Notebook {
    pub fn new(fetcher: AnswerFetcher, announcer: Arc<dyn Announcer>, locale: impl Into<String>) -> Self {
        Self {
            state: NotebookState::default(),
            fetcher,
            announcer,
            locale: locale.into(),
        }
    }

    pub fn state(&self) -> &NotebookState {
        &self.state
    }

    fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    pub fn set_question(&mut self, text: impl Into<String>) {
        self.dispatch(Action::EditDraft(text.into()));
    }

    /// Load a PDF from disk. On failure the previous document stays in place
    /// and the error is returned for the caller to surface.
    pub async fn open(&mut self, path: &Path) -> Result<UploadReport, StudySpeakError> {
        match load_document(path).await {
            Ok(doc) => Ok(self.accept_document(&doc)),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load PDF");
                Err(e.into())
            }
        }
    }

    /// Replace the document with freshly extracted text.
    pub fn accept_document(&mut self, doc: &ExtractedDocument) -> UploadReport {
        let report = UploadReport {
            filename: doc.filename.clone(),
            pages: doc.pages.len(),
            chars: doc.total_chars(),
        };
        self.dispatch(Action::DocumentLoaded(doc.to_document_text()));
        info!(file = %report.filename, pages = report.pages, "Document replaced");
        report
    }

    /// Run one ask cycle for the current draft.
    ///
    /// Returns `None` without touching state when the draft is blank or a
    /// cycle is already running.
    pub async fn ask(&mut self) -> Option<AskCycle> {
        if !self.state.can_ask() {
            return None;
        }
        self.dispatch(Action::AskStarted);

        let question = self.state.draft().to_string();
        let (answer, source) = self.answer(&question).await;
        info!(source = ?source, "Question answered");

        let entry = ConversationEntry {
            question,
            answer,
            source,
        };
        self.dispatch(Action::AskFinished(entry.clone()));

        let speech = self.announcer.announce(&entry.answer, &self.locale);
        Some(AskCycle { entry, speech })
    }

    /// Local search first; the remote model only on a miss.
    async fn answer(&self, question: &str) -> (String, AnswerSource) {
        match search(self.state.document(), question) {
            SearchOutcome::Snippet(snippet) => (snippet.to_string(), AnswerSource::Document),
            SearchOutcome::Unclear => (UNCLEAR_MATCH_ANSWER.to_string(), AnswerSource::DocumentUnclear),
            SearchOutcome::Miss => {
                let remote = self.fetcher.fetch(question).await;
                (remote.text().to_string(), remote.source())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use studyspeak_core::{FETCH_ERROR_ANSWER, NO_COMPLETION_ANSWER};
    use studyspeak_ingest::PageContent;
    use studyspeak_llm::{LlmError, LlmProvider, Message};

    use super::*;

    /// Answers every request with the same canned result and counts calls.
    struct FakeProvider {
        reply: fn() -> Result<String, LlmError>,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl FakeProvider {
        fn new(reply: fn() -> Result<String, LlmError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmProvider for FakeProvider {
        async fn complete(&self, messages: Vec<Message>) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(messages);
            (self.reply)()
        }
    }

    /// Records every utterance; handles settle immediately.
    #[derive(Default)]
    struct RecordingAnnouncer {
        spoken: Mutex<Vec<(String, String)>>,
    }

    impl Announcer for RecordingAnnouncer {
        fn announce(&self, text: &str, locale: &str) -> SpeechHandle {
            self.spoken
                .lock()
                .unwrap()
                .push((text.to_string(), locale.to_string()));
            SpeechHandle::settled(Ok(()))
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn notebook(provider: Arc<FakeProvider>) -> (Notebook, Arc<RecordingAnnouncer>) {
        let announcer = Arc::new(RecordingAnnouncer::default());
        let fetcher = AnswerFetcher::new(provider, "You are a helpful Indian tutor.");
        (Notebook::new(fetcher, announcer.clone(), "en-IN"), announcer)
    }

    fn single_page(text: &str) -> ExtractedDocument {
        ExtractedDocument {
            filename: "notes.pdf".into(),
            pages: vec![PageContent {
                page_number: 1,
                text: text.into(),
            }],
        }
    }

    fn unreachable_reply() -> Result<String, LlmError> {
        Ok("remote should not be asked".into())
    }

    #[tokio::test]
    async fn local_hit_answers_from_document() {
        let provider = FakeProvider::new(unreachable_reply);
        let (mut nb, announcer) = notebook(provider.clone());
        nb.accept_document(&single_page("The capital of France is Paris. It is a large city."));

        nb.set_question("capital of France");
        let cycle = nb.ask().await.unwrap();
        cycle.speech.wait().await.unwrap();

        assert_eq!(cycle.entry.answer, "The capital of France is Paris");
        assert_eq!(cycle.entry.source, AnswerSource::Document);
        assert_eq!(provider.call_count(), 0);
        assert_eq!(
            announcer.spoken.lock().unwrap().as_slice(),
            &[("The capital of France is Paris".to_string(), "en-IN".to_string())]
        );
    }

    #[tokio::test]
    async fn miss_on_empty_document_asks_remote_once_with_exact_question() {
        let provider = FakeProvider::new(|| Ok("42".into()));
        let (mut nb, announcer) = notebook(provider.clone());

        nb.set_question("anything");
        let cycle = nb.ask().await.unwrap();
        cycle.speech.wait().await.unwrap();

        assert_eq!(provider.call_count(), 1);
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0][1].content, "anything");

        assert_eq!(nb.state().log().len(), 1);
        assert_eq!(nb.state().log()[0].answer, "42");
        assert_eq!(nb.state().log()[0].source, AnswerSource::Model);
        assert_eq!(announcer.spoken.lock().unwrap()[0].0, "42");
    }

    #[tokio::test]
    async fn missing_completion_becomes_no_answer() {
        let provider = FakeProvider::new(|| Err(LlmError::MissingContent("no choices".into())));
        let (mut nb, announcer) = notebook(provider);

        nb.set_question("what is osmosis?");
        let cycle = nb.ask().await.unwrap();

        assert_eq!(cycle.entry.answer, NO_COMPLETION_ANSWER);
        assert_eq!(cycle.entry.source, AnswerSource::ModelEmpty);
        assert_eq!(announcer.spoken.lock().unwrap()[0].0, NO_COMPLETION_ANSWER);
    }

    #[tokio::test]
    async fn remote_failure_is_logged_like_an_answer() {
        let provider = FakeProvider::new(|| {
            Err(LlmError::ApiError {
                status: 401,
                body: "unauthorized".into(),
            })
        });
        let (mut nb, announcer) = notebook(provider);

        nb.set_question("what is osmosis?");
        nb.ask().await.unwrap();

        let entry = &nb.state().log()[0];
        assert_eq!(entry.answer, FETCH_ERROR_ANSWER);
        assert_eq!(entry.source, AnswerSource::ModelError);
        assert!(entry.source.is_placeholder());
        assert_eq!(announcer.spoken.lock().unwrap()[0].0, FETCH_ERROR_ANSWER);
    }

    #[tokio::test]
    async fn boundary_match_is_unclear_without_remote() {
        let provider = FakeProvider::new(unreachable_reply);
        let (mut nb, _) = notebook(provider.clone());
        nb.accept_document(&single_page("The war ended. Peace followed."));

        nb.set_question("ended. peace");
        let cycle = nb.ask().await.unwrap();

        assert_eq!(cycle.entry.answer, UNCLEAR_MATCH_ANSWER);
        assert_eq!(cycle.entry.source, AnswerSource::DocumentUnclear);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_question_is_a_no_op() {
        let provider = FakeProvider::new(unreachable_reply);
        let (mut nb, announcer) = notebook(provider.clone());

        for blank in ["", "   ", "\t\n"] {
            nb.set_question(blank);
            let before = nb.state().clone();
            assert!(nb.ask().await.is_none());
            assert_eq!(nb.state(), &before);
        }
        assert!(nb.state().log().is_empty());
        assert!(!nb.state().is_busy());
        assert_eq!(provider.call_count(), 0);
        assert!(announcer.spoken.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cycle_clears_draft_and_busy_and_appends_in_order() {
        let provider = FakeProvider::new(|| Ok("from the model".into()));
        let (mut nb, _) = notebook(provider);
        nb.accept_document(&single_page("Alpha is first. Beta is second."));

        for q in ["alpha", "zeta", "beta"] {
            nb.set_question(q);
            nb.ask().await.unwrap();
            assert_eq!(nb.state().draft(), "");
            assert!(!nb.state().is_busy());
        }

        let log = nb.state().log();
        let questions: Vec<&str> = log.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, ["alpha", "zeta", "beta"]);
        assert_eq!(log[0].answer, "Alpha is first");
        assert_eq!(log[1].answer, "from the model");
        assert_eq!(log[2].answer, "Beta is second.");
    }

    #[tokio::test]
    async fn new_document_replaces_old_one() {
        let provider = FakeProvider::new(|| Ok("remote".into()));
        let (mut nb, _) = notebook(provider.clone());
        nb.accept_document(&single_page("Old notes about volcanoes."));
        let report = nb.accept_document(&single_page("New notes about glaciers."));
        assert_eq!(report.pages, 1);
        assert_eq!(nb.state().document().as_str(), "New notes about glaciers.");

        nb.set_question("volcanoes");
        let cycle = nb.ask().await.unwrap();
        assert_eq!(cycle.entry.source, AnswerSource::Model);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_open_keeps_previous_document() {
        let provider = FakeProvider::new(unreachable_reply);
        let (mut nb, _) = notebook(provider);
        nb.accept_document(&single_page("Kept text."));

        let err = nb
            .open(Path::new("/definitely/missing/notes.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, StudySpeakError::Io(_)));
        assert_eq!(nb.state().document().as_str(), "Kept text.");
    }

    #[test]
    fn reduce_ignores_ask_while_busy() {
        let state = NotebookState::default()
            .reduce(Action::EditDraft("first".into()))
            .reduce(Action::AskStarted);
        assert!(state.is_busy());
        assert!(!state.can_ask());

        let again = state.clone().reduce(Action::AskStarted);
        assert_eq!(again, state);
    }

    #[test]
    fn reduce_finish_appends_and_resets() {
        let entry = ConversationEntry {
            question: "q".into(),
            answer: "a".into(),
            source: AnswerSource::Model,
        };
        let state = NotebookState::default()
            .reduce(Action::EditDraft("q".into()))
            .reduce(Action::AskStarted)
            .reduce(Action::AskFinished(entry.clone()));
        assert_eq!(state.log(), &[entry]);
        assert_eq!(state.draft(), "");
        assert!(!state.is_busy());
    }
}
