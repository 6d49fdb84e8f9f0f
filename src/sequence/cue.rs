/// Cue table for the reveal timeline
///
/// The offsets are authored constants, not configuration: the experience is a
/// fixed piece, every trigger plays the same five-step timeline.
use std::fmt;

use super::stage::PresentationState;

/// Procedural sound effects the sequencer can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Low whoosh played as the envelope flap opens
    EnvelopeOpen,

    /// Rising three-note chime played as the card slides out
    CardReveal,
}

impl fmt::Display for SoundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundEffect::EnvelopeOpen => write!(f, "envelope-open"),
            SoundEffect::CardReveal => write!(f, "card-reveal"),
        }
    }
}

/// One step of the reveal timeline: a stage transition with an optional
/// sound cue, fired at a fixed offset from the trigger instant.
#[derive(Debug, Clone, Copy)]
pub struct CueStep {
    /// Milliseconds after `trigger()` at which this step fires
    pub offset_ms: u64,

    /// Stage the timeline advances to
    pub stage: PresentationState,

    /// Sound cue fired together with the transition, if any
    pub effect: Option<SoundEffect>,
}

/// The authored timeline. One trigger schedules exactly these five steps;
/// one reset cancels whatever part of them is still pending.
pub const CUE_TABLE: [CueStep; 5] = [
    CueStep {
        offset_ms: 0,
        stage: PresentationState::Opening,
        effect: Some(SoundEffect::EnvelopeOpen),
    },
    CueStep {
        offset_ms: 800,
        stage: PresentationState::CardRevealed,
        effect: Some(SoundEffect::CardReveal),
    },
    CueStep {
        offset_ms: 1600,
        stage: PresentationState::PhotosRevealed,
        effect: None,
    },
    CueStep {
        offset_ms: 2400,
        stage: PresentationState::MessageRevealed,
        effect: None,
    },
    CueStep {
        offset_ms: 2800,
        stage: PresentationState::CelebrationActive,
        effect: None,
    },
];
