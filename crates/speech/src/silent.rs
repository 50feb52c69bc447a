use tracing::debug;

use crate::traits::{Announcer, SpeechHandle};

/// Announcer for muted sessions; every handle is already settled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn announce(&self, text: &str, locale: &str) -> SpeechHandle {
        debug!(chars = text.len(), locale, "Speech muted");
        SpeechHandle::settled(Ok(()))
    }

    fn name(&self) -> &str {
        "silent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn silent_handle_is_settled() {
        let handle = SilentAnnouncer.announce("hello", "en-IN");
        assert!(handle.is_finished());
        handle.wait().await.unwrap();
    }
}
