//! Text-to-speech for answers.
//!
//! This crate provides:
//! - `Announcer` trait for pluggable synthesizers
//! - `CommandAnnouncer`, which runs a local TTS program per utterance
//! - `SilentAnnouncer` for muted sessions
//! - `SpeechHandle`, returned by every announcement so callers can await
//!   completion or drop it and move on

pub mod command;
pub mod silent;
pub mod traits;

use std::sync::Arc;

use studyspeak_core::config::SpeechConfig;
use studyspeak_core::StudySpeakError;

pub use command::CommandAnnouncer;
pub use silent::SilentAnnouncer;
pub use traits::{Announcer, SpeechError, SpeechHandle};

/// Build the announcer selected by config.
pub fn create_announcer(config: &SpeechConfig) -> Result<Arc<dyn Announcer>, StudySpeakError> {
    if !config.enabled {
        return Ok(Arc::new(SilentAnnouncer));
    }
    let (program, args) = config.command_line()?;
    Ok(Arc::new(CommandAnnouncer::new(program, args)))
}
