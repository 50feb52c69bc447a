//! Announcer trait definition and shared error types.

use tokio::task::JoinHandle;

/// Errors that can occur while synthesizing speech.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("speech task aborted: {0}")]
    Aborted(String),
}

/// Completion handle for one utterance.
///
/// Dropping the handle does not cancel the utterance.
#[derive(Debug)]
pub struct SpeechHandle {
    inner: HandleInner,
}

#[derive(Debug)]
enum HandleInner {
    Running(JoinHandle<Result<(), SpeechError>>),
    Done(Result<(), SpeechError>),
}

impl SpeechHandle {
    /// Wrap a spawned synthesis task.
    pub fn spawned(task: JoinHandle<Result<(), SpeechError>>) -> Self {
        Self { inner: HandleInner::Running(task) }
    }

    /// A handle that has already settled.
    pub fn settled(result: Result<(), SpeechError>) -> Self {
        Self { inner: HandleInner::Done(result) }
    }

    pub fn is_finished(&self) -> bool {
        match &self.inner {
            HandleInner::Running(task) => task.is_finished(),
            HandleInner::Done(_) => true,
        }
    }

    /// Wait for the utterance to finish.
    pub async fn wait(self) -> Result<(), SpeechError> {
        match self.inner {
            HandleInner::Running(task) => task
                .await
                .unwrap_or_else(|e| Err(SpeechError::Aborted(e.to_string()))),
            HandleInner::Done(result) => result,
        }
    }
}

/// Trait for speech synthesizers.
pub trait Announcer: Send + Sync {
    /// Start reading `text` aloud in `locale`. Returns immediately; prior
    /// utterances are neither awaited nor cancelled.
    fn announce(&self, text: &str, locale: &str) -> SpeechHandle;

    /// Human-readable name for this synthesizer (e.g., "command").
    fn name(&self) -> &str;
}
