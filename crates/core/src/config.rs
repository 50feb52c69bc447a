use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StudySpeakError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful Indian tutor.";
pub const DEFAULT_SPEECH_LOCALE: &str = "en-IN";
pub const DEFAULT_SPEECH_COMMAND: &str = "espeak-ng -v {locale}";

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub llm: LlmConfig,
    pub speech: SpeechConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `STUDYSPEAK_PROFILE`. When set (e.g. `CLASS`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("STUDYSPEAK_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            llm: LlmConfig::from_env_profiled(p),
            speech: SpeechConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  llm:     model={}, base_url={}, key_configured={}",
            self.llm.model,
            self.llm.base_url,
            self.llm.is_configured()
        );
        tracing::info!(
            "  speech:  enabled={}, locale={}, command={}",
            self.speech.enabled,
            self.speech.locale,
            self.speech.command
        );
    }
}

// ── Secrets ───────────────────────────────────────────────────

/// Bearer credential for the chat-completion endpoint. Never printed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("ApiKey(<unset>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

// ── LLM (OpenAI chat completions) ─────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Missing key is allowed: the endpoint answers 401 and the ask cycle
    /// records the fetch-error placeholder.
    #[serde(skip_serializing)]
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub base_url: String,
    pub system_prompt: String,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            api_key: profiled_env_opt(p, "OPENAI_API_KEY").map(ApiKey::new),
            model: profiled_env_or(p, "OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            base_url: profiled_env_or(p, "OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            system_prompt: profiled_env_or(p, "STUDYSPEAK_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

// ── Speech synthesis ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// BCP-47 tag handed to the synthesizer.
    pub locale: String,
    /// Program plus arguments; `{locale}` is substituted and the text is
    /// appended as the last argument.
    pub command: String,
}

impl SpeechConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            enabled: profiled_env_bool(p, "SPEECH_ENABLED", true),
            locale: profiled_env_or(p, "SPEECH_LOCALE", DEFAULT_SPEECH_LOCALE),
            command: profiled_env_or(p, "SPEECH_COMMAND", DEFAULT_SPEECH_COMMAND),
        }
    }

    /// Split `command` into program and argument templates. `{locale}` is
    /// left in place for the synthesizer to fill per utterance.
    pub fn command_line(&self) -> Result<(String, Vec<String>), StudySpeakError> {
        let mut parts = self.command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| StudySpeakError::Config("SPEECH_COMMAND is empty".into()))?;
        Ok((program, parts.collect()))
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            locale: DEFAULT_SPEECH_LOCALE.to_string(),
            command: DEFAULT_SPEECH_COMMAND.to_string(),
        }
    }
}
