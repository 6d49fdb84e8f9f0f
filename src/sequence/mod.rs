/// Presentation sequencer
///
/// Drives the timed reveal: a five-step cue table played by a controller
/// that schedules through an injectable clock and emits stage changes on
/// the event bus.
///
/// ```text
/// trigger() ──> SequenceController ──> CueScheduler (timers)
///                      │                     │
///                      │   fire(step)  <─────┘
///                      ├──> EventBus: StageChanged
///                      └──> SoundCueSink: EnvelopeOpen / CardReveal
/// ```
pub mod controller;
pub mod cue;
pub mod scheduler;
pub mod stage;

// Re-export commonly used types
pub use controller::{SequenceController, SoundCueSink};
pub use cue::{CueStep, SoundEffect, CUE_TABLE};
pub use scheduler::{CueScheduler, ManualScheduler, TimerScheduler};
pub use stage::PresentationState;
