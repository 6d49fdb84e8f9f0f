//! Timed multi-stage card reveal with a self-contained audio subsystem.
//!
//! One trigger plays an authored five-step timeline (envelope opens, card
//! slides out, photos, message, confetti), each step a stage change plus an
//! optional procedurally synthesized sound cue. Background music switches
//! between an embedded default loop and a user-supplied track behind a
//! scoped handle, and a fixed voice greeting plays single-flight.
//!
//! ```no_run
//! use envelope_surprise::{CardConfig, CardExperience};
//!
//! let experience = CardExperience::new(CardConfig::default());
//! let (events, _id) = experience.subscribe();
//!
//! experience.open();
//! while let Ok(event) = events.recv() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod app;
pub mod audio_system;
pub mod config;
pub mod error;
pub mod messaging;
pub mod sequence;

pub use app::CardExperience;
pub use config::CardConfig;
pub use error::{AppResult, AudioError, VoiceError};
pub use messaging::{Event, EventBus};
pub use sequence::PresentationState;
