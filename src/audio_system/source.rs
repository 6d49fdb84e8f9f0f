/// Background-track source selection
///
/// A user-supplied track overrides the embedded default; the manager owns
/// which one is active and the handle backing a custom track.
use crate::error::AudioError;

use super::handle::TrackHandle;

/// The track currently feeding background playback
pub enum ActiveTrack {
    /// Embedded default loop
    Default,

    /// User-supplied track, alive only while this variant holds the handle
    Custom(TrackHandle),
}

impl ActiveTrack {
    pub fn is_custom(&self) -> bool {
        matches!(self, ActiveTrack::Custom(_))
    }

    /// Id of the backing custom handle, if any
    pub fn custom_id(&self) -> Option<u64> {
        match self {
            ActiveTrack::Default => None,
            ActiveTrack::Custom(handle) => Some(handle.id()),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            ActiveTrack::Default => SourceKind::Default,
            ActiveTrack::Custom(_) => SourceKind::Custom,
        }
    }
}

impl Default for ActiveTrack {
    fn default() -> Self {
        ActiveTrack::Default
    }
}

/// Which kind of track is active, for collaborators that only need the tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Default,
    Custom,
}

/// Externally owned playback toggles, pushed into the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackIntent {
    pub sound_enabled: bool,
    pub music_playing: bool,
}

impl PlaybackIntent {
    pub fn new(sound_enabled: bool, music_playing: bool) -> Self {
        Self {
            sound_enabled,
            music_playing,
        }
    }

    /// Effective play state: music only runs while sound is enabled too
    pub fn should_play(&self) -> bool {
        self.sound_enabled && self.music_playing
    }
}

/// Coarse upload gate: only the declared media type is inspected, never the
/// content. Runs upstream of the manager so a rejected upload cannot touch
/// the active source.
pub fn validate_media_type(media_type: &str) -> Result<(), AudioError> {
    if media_type.trim().to_ascii_lowercase().starts_with("audio/") {
        Ok(())
    } else {
        Err(AudioError::InvalidFormat {
            media_type: media_type.to_string(),
        })
    }
}
