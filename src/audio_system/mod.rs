/// Audio subsystem
///
/// Three independent pieces behind one module:
/// - background music with source selection (default vs. user-supplied
///   track, scoped handle lifecycle),
/// - procedural sound effects rendered per cue,
/// - the single-flight voice greeting.
///
/// ```text
/// AudioSourceManager ── ActiveTrack (Default | Custom(TrackHandle))
///        │                              │
///        └── rodio Sink (looping)       └── revoked on supersede/teardown
///
/// SoundEffectSynthesizer ── descriptor -> samples -> detached Sink per cue
/// VoiceGreetingPlayback  ── embedded clip, single-flight, own thread
/// ```
///
/// All three swallow environment rejections: audio is decorative and never
/// aborts the reveal timeline.
pub mod handle;
pub mod manager;
pub mod source;
pub mod synth;
pub mod voice;

// Re-export commonly used types
pub use handle::TrackHandle;
pub use manager::AudioSourceManager;
pub use source::{validate_media_type, ActiveTrack, PlaybackIntent, SourceKind};
pub use synth::{SoundEffectDescriptor, SoundEffectSynthesizer};
pub use voice::VoiceGreetingPlayback;
