pub mod openai;

use std::sync::Arc;

use studyspeak_core::config::LlmConfig;

use crate::provider::LlmProvider;

/// Create the chat-completion provider described by config.
///
/// A missing API key is not an error here: requests go out without a
/// bearer header and the endpoint's 401 becomes the fetch-error answer.
pub fn create_provider(llm_config: &LlmConfig) -> Arc<dyn LlmProvider> {
    if !llm_config.is_configured() {
        tracing::warn!("OPENAI_API_KEY not set; remote answers will fail");
    }
    Arc::new(openai::OpenAiProvider::new(
        llm_config.api_key.clone(),
        llm_config.model.clone(),
        llm_config.base_url.clone(),
    ))
}
