/// Event types for the reveal experience
///
/// Events are notifications of things that happened (past tense), broadcast
/// to every subscriber. The presentation layer renders from `StageChanged`;
/// `UploadRejected` and `VoiceGreetingFailed` are the only user-visible
/// failure notices the core produces.
use crate::sequence::PresentationState;

#[derive(Debug, Clone)]
pub enum Event {
    /// The reveal timeline advanced (or was reset to Closed)
    StageChanged { stage: PresentationState },

    /// A custom background track was installed
    CustomTrackLoaded { size_bytes: usize },

    /// The custom track was cleared, back to the default track
    CustomTrackCleared,

    /// An uploaded file was rejected before reaching the audio source
    UploadRejected { media_type: String },

    /// Effective background-music state changed
    MusicStateChanged { playing: bool },

    /// Voice greeting playback began
    VoiceGreetingStarted { recipient: String },

    /// Voice greeting played to completion
    VoiceGreetingFinished,

    /// Voice greeting could not be played; safe to retry immediately
    VoiceGreetingFailed { message: String },
}

impl Event {
    /// Whether this event should be surfaced to the user as a notice
    pub fn is_user_notice(&self) -> bool {
        matches!(
            self,
            Event::UploadRejected { .. } | Event::VoiceGreetingFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_notice_classification() {
        assert!(Event::UploadRejected {
            media_type: "text/plain".to_string()
        }
        .is_user_notice());
        assert!(Event::VoiceGreetingFailed {
            message: "no device".to_string()
        }
        .is_user_notice());

        assert!(!Event::StageChanged {
            stage: PresentationState::Opening
        }
        .is_user_notice());
        assert!(!Event::VoiceGreetingFinished.is_user_notice());
    }
}
