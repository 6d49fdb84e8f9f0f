/// Reveal timeline stages
///
/// Represents the lifecycle of the card reveal with clear stage ordering.
use std::fmt;

/// Stage of the presentation timeline
///
/// Monotonic: once advanced past `Closed` the timeline only moves forward;
/// the only way back to `Closed` is a reset.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum PresentationState {
    /// Envelope is sealed, waiting for the open gesture
    Closed,

    /// Envelope flap is opening
    Opening,

    /// Card has slid out of the envelope
    CardRevealed,

    /// Photo section is visible
    PhotosRevealed,

    /// Message section is visible
    MessageRevealed,

    /// Confetti celebration is running
    CelebrationActive,
}

impl PresentationState {
    /// Check if the envelope is still sealed
    pub fn is_closed(&self) -> bool {
        matches!(self, PresentationState::Closed)
    }

    /// Check if the reveal has reached its final stage
    pub fn is_celebrating(&self) -> bool {
        matches!(self, PresentationState::CelebrationActive)
    }

    /// Get a human-readable description of the stage
    pub fn description(&self) -> &'static str {
        match self {
            PresentationState::Closed => "Envelope sealed",
            PresentationState::Opening => "Envelope opening",
            PresentationState::CardRevealed => "Card revealed",
            PresentationState::PhotosRevealed => "Photos revealed",
            PresentationState::MessageRevealed => "Message revealed",
            PresentationState::CelebrationActive => "Celebration",
        }
    }
}

impl Default for PresentationState {
    fn default() -> Self {
        PresentationState::Closed
    }
}

impl fmt::Display for PresentationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_predicates() {
        assert!(PresentationState::Closed.is_closed());
        assert!(!PresentationState::Closed.is_celebrating());

        assert!(!PresentationState::Opening.is_closed());
        assert!(PresentationState::CelebrationActive.is_celebrating());
    }

    #[test]
    fn test_default_is_closed() {
        assert_eq!(PresentationState::default(), PresentationState::Closed);
    }

    #[test]
    fn test_stage_ordering() {
        // The derived ordering mirrors the timeline order
        assert!(PresentationState::Closed < PresentationState::Opening);
        assert!(PresentationState::Opening < PresentationState::CardRevealed);
        assert!(PresentationState::CardRevealed < PresentationState::PhotosRevealed);
        assert!(PresentationState::PhotosRevealed < PresentationState::MessageRevealed);
        assert!(PresentationState::MessageRevealed < PresentationState::CelebrationActive);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(PresentationState::CardRevealed.to_string(), "Card revealed");
    }
}
