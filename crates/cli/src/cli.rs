use std::path::PathBuf;

use clap::Parser;
use studyspeak_core::config::{ApiKey, Config};

/// Ask questions about a PDF and hear the answers.
///
/// Answers come from the document itself when the question text appears in
/// it, otherwise from an OpenAI chat model.
#[derive(Parser, Debug)]
#[command(name = "studyspeak", version, about = "Talk to your PDF study notes")]
pub struct CliArgs {
    /// PDF to load at startup
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Chat model override (default: OPENAI_MODEL or gpt-3.5-turbo)
    #[arg(long)]
    pub model: Option<String>,

    /// API key (overrides OPENAI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Speech locale override (default: SPEECH_LOCALE or en-IN)
    #[arg(long)]
    pub locale: Option<String>,

    /// Do not read answers aloud
    #[arg(long)]
    pub mute: bool,
}

impl CliArgs {
    /// Layer command-line overrides on top of environment config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(key) = &self.api_key {
            config.llm.api_key = Some(ApiKey::new(key.clone()));
        }
        if let Some(locale) = &self.locale {
            config.speech.locale = locale.clone();
        }
        if self.mute {
            config.speech.enabled = false;
        }
    }
}

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load a new PDF, replacing the current document.
    Open(PathBuf),
    History,
    Help,
    Quit,
    /// Anything else is a question (possibly blank).
    Ask(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "exit" | "quit" | "/exit" | "/quit" => return Command::Quit,
            "/history" => return Command::History,
            "/help" | "?" => return Command::Help,
            _ => {}
        }
        if trimmed == "/open" {
            return Command::Help;
        }
        if let Some(path) = trimmed.strip_prefix("/open ") {
            return Command::Open(PathBuf::from(path.trim()));
        }
        Command::Ask(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("/history"), Command::History);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(
            Command::parse("/open  notes/chapter 1.pdf "),
            Command::Open(PathBuf::from("notes/chapter 1.pdf"))
        );
        assert_eq!(Command::parse("/open"), Command::Help);
    }

    #[test]
    fn test_question_is_kept_verbatim() {
        assert_eq!(
            Command::parse("What is the capital of France?"),
            Command::Ask("What is the capital of France?".into())
        );
        assert_eq!(Command::parse("   "), Command::Ask("   ".into()));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::for_profile("STUDYSPEAK_CLI_TEST_UNUSED");
        let args = CliArgs::parse_from([
            "studyspeak",
            "--model",
            "gpt-4o-mini",
            "--api-key",
            "sk-cli",
            "--locale",
            "hi-IN",
            "--mute",
        ]);
        args.apply(&mut config);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key.as_ref().map(|k| k.expose()), Some("sk-cli"));
        assert_eq!(config.speech.locale, "hi-IN");
        assert!(!config.speech.enabled);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = Config::for_profile("STUDYSPEAK_CLI_TEST_UNUSED");
        let before_model = config.llm.model.clone();
        let before_enabled = config.speech.enabled;
        CliArgs::parse_from(["studyspeak"]).apply(&mut config);
        assert_eq!(config.llm.model, before_model);
        assert_eq!(config.speech.enabled, before_enabled);
    }
}
