use thiserror::Error;

/// Domain errors using thiserror for structured error handling.
///
/// Audio failures are decorative relative to the reveal timeline: they are
/// logged and dropped at the call site, never propagated into the sequencer.
/// Only upload validation and voice-greeting failure reach the user.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Uploaded file is not audio (declared type: {media_type})")]
    InvalidFormat { media_type: String },

    #[error("No audio output device available")]
    OutputUnavailable,

    #[error("Failed to decode audio data")]
    DecodeFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Audio playback failed")]
    PlaybackFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("No audio output device available for greeting")]
    OutputUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to decode greeting clip")]
    DecodeFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Greeting playback failed: {0}")]
    PlaybackFailed(String),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
