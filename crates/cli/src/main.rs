mod cli;
mod notebook;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use studyspeak_core::config::{self, Config};
use studyspeak_llm::{create_provider, AnswerFetcher};
use studyspeak_speech::create_announcer;

use crate::cli::{CliArgs, Command};
use crate::notebook::Notebook;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let terminal = Terminal::new();

    // Load config: .env, then environment, then command-line overrides
    config::load_dotenv();
    let mut config = Config::from_env();
    args.apply(&mut config);
    config.log_summary();

    let fetcher = AnswerFetcher::new(create_provider(&config.llm), config.llm.system_prompt.clone());
    let announcer =
        create_announcer(&config.speech).context("failed to set up speech synthesis")?;
    let mut notebook = Notebook::new(fetcher, announcer.clone(), config.speech.locale.clone());

    terminal.print_banner(&config.llm.model, &config.speech.locale, announcer.name())?;

    if let Some(ref path) = args.pdf {
        match notebook.open(path).await {
            Ok(report) => terminal.print_upload(&report)?,
            Err(e) => terminal.print_error(&format!("could not load {}: {}", path.display(), e))?,
        }
    }

    // REPL loop
    loop {
        let line = match terminal.read_input()? {
            Some(line) => line,
            None => break,
        };

        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => terminal.print_help()?,
            Command::History => terminal.print_history(notebook.state().log())?,
            Command::Open(path) => match notebook.open(&path).await {
                Ok(report) => terminal.print_upload(&report)?,
                Err(e) => {
                    terminal.print_error(&format!("could not load {}: {}", path.display(), e))?;
                    if notebook.state().document().is_loaded() {
                        terminal.print_info("The previously loaded PDF is still active.")?;
                    }
                }
            },
            Command::Ask(question) => {
                notebook.set_question(question);
                if !notebook.state().can_ask() {
                    continue;
                }

                let spinner = terminal.start_spinner("Asking...")?;
                let cycle = notebook.ask().await;
                spinner.stop();

                if let Some(cycle) = cycle {
                    terminal.print_entry(&cycle.entry)?;
                    // Speech keeps playing in the background; the prompt returns now.
                    tokio::spawn(async move {
                        if let Err(e) = cycle.speech.wait().await {
                            debug!(error = %e, "Speech did not complete");
                        }
                    });
                }
            }
        }
    }

    info!(entries = notebook.state().log().len(), "Session ended");
    terminal.print_info("Goodbye.")?;
    Ok(())
}
