//! Remote fallback used when the document itself has no answer.

use std::sync::Arc;

use studyspeak_core::{AnswerSource, FETCH_ERROR_ANSWER, NO_COMPLETION_ANSWER};
use tracing::{debug, warn};

use crate::provider::{LlmError, LlmProvider, Message};

/// Outcome of one remote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAnswer {
    /// Text of the first completion choice.
    Completion(String),
    /// The response parsed but carried no completion content.
    Empty,
    /// Transport failure, non-success status, or a non-JSON body.
    Failed(String),
}

impl RemoteAnswer {
    /// Text recorded in the conversation log and spoken aloud.
    pub fn text(&self) -> &str {
        match self {
            RemoteAnswer::Completion(text) => text,
            RemoteAnswer::Empty => NO_COMPLETION_ANSWER,
            RemoteAnswer::Failed(_) => FETCH_ERROR_ANSWER,
        }
    }

    pub fn source(&self) -> AnswerSource {
        match self {
            RemoteAnswer::Completion(_) => AnswerSource::Model,
            RemoteAnswer::Empty => AnswerSource::ModelEmpty,
            RemoteAnswer::Failed(_) => AnswerSource::ModelError,
        }
    }
}

impl From<Result<String, LlmError>> for RemoteAnswer {
    fn from(result: Result<String, LlmError>) -> Self {
        match result {
            Ok(text) => RemoteAnswer::Completion(text),
            Err(LlmError::MissingContent(_)) => RemoteAnswer::Empty,
            Err(e) => RemoteAnswer::Failed(e.to_string()),
        }
    }
}

/// Sends a question with the tutoring persona prompt, once, no retries.
#[derive(Clone)]
pub struct AnswerFetcher {
    provider: Arc<dyn LlmProvider>,
    system_prompt: String,
}

impl AnswerFetcher {
    pub fn new(provider: Arc<dyn LlmProvider>, system_prompt: impl Into<String>) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
        }
    }

    /// The two-message conversation sent for `question` (passed verbatim).
    pub fn messages_for(&self, question: &str) -> Vec<Message> {
        vec![Message::system(self.system_prompt.clone()), Message::user(question)]
    }

    pub async fn fetch(&self, question: &str) -> RemoteAnswer {
        let answer = RemoteAnswer::from(self.provider.complete(self.messages_for(question)).await);
        match &answer {
            RemoteAnswer::Completion(text) => debug!(chars = text.len(), "Remote answer received"),
            RemoteAnswer::Empty => warn!("Remote response had no completion content"),
            RemoteAnswer::Failed(reason) => warn!(error = %reason, "Remote answer request failed"),
        }
        answer
    }
}
