//! Speech via a local text-to-speech program (espeak-ng, say, ...).

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::traits::{Announcer, SpeechError, SpeechHandle};

/// Placeholder in argument templates replaced by the utterance locale.
pub const LOCALE_PLACEHOLDER: &str = "{locale}";

/// Ends option parsing so an utterance starting with `-` stays an operand.
pub const END_OF_OPTIONS: &str = "--";

/// Runs `program args... -- <text>` once per utterance on a background task.
#[derive(Debug, Clone)]
pub struct CommandAnnouncer {
    program: String,
    args: Vec<String>,
}

impl CommandAnnouncer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Final argument list for one utterance.
    pub fn arguments(&self, text: &str, locale: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace(LOCALE_PLACEHOLDER, locale))
            .chain([END_OF_OPTIONS.to_string(), text.to_string()])
            .collect()
    }
}

impl Announcer for CommandAnnouncer {
    fn announce(&self, text: &str, locale: &str) -> SpeechHandle {
        let program = self.program.clone();
        let args = self.arguments(text, locale);
        debug!(program = %program, locale, chars = text.len(), "Speaking answer");

        let task = tokio::spawn(async move {
            let output = Command::new(&program)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .output()
                .await
                .map_err(|source| {
                    warn!(program = %program, error = %source, "Speech program failed to start");
                    SpeechError::Spawn {
                        program: program.clone(),
                        source,
                    }
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                warn!(program = %program, status = %output.status, "Speech program failed");
                return Err(SpeechError::Failed {
                    program,
                    status: output.status.to_string(),
                    stderr,
                });
            }
            Ok(())
        });

        SpeechHandle::spawned(task)
    }

    fn name(&self) -> &str {
        "command"
    }
}
