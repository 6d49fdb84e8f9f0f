/// Experience facade
///
/// Wires the sequencer and the audio subsystem together and exposes the
/// surface the presentation layer drives: open/reset gestures, the sound
/// and music toggles, track upload, and the greeting button. Holds the
/// output stream alive for the lifetime of the experience; every other
/// component only sees a handle.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Receiver;
use rodio::OutputStream;

use crate::audio_system::{
    validate_media_type, AudioSourceManager, SoundEffectSynthesizer, SourceKind,
    VoiceGreetingPlayback,
};
use crate::config::CardConfig;
use crate::error::AudioError;
use crate::messaging::{Event, EventBus, SubscriberId};
use crate::sequence::{
    CueScheduler, PresentationState, SequenceController, SoundCueSink, TimerScheduler,
};

pub struct CardExperience {
    config: CardConfig,
    events: EventBus,
    sequence: SequenceController,
    music: AudioSourceManager,
    voice: VoiceGreetingPlayback,
    sound_enabled: Arc<AtomicBool>,
    music_playing: AtomicBool,

    // Keeps the shared output device alive; rodio stops all playback the
    // moment the stream drops.
    _output: Option<OutputStream>,
}

impl CardExperience {
    /// Build the experience with the wall-clock scheduler
    pub fn new(config: CardConfig) -> Self {
        Self::with_scheduler(config, Arc::new(TimerScheduler::new()))
    }

    /// Build with an injected scheduler (virtual clocks in tests)
    pub fn with_scheduler(config: CardConfig, scheduler: Arc<dyn CueScheduler>) -> Self {
        let events = EventBus::new();

        let (output, output_handle) = match OutputStream::try_default() {
            Ok((stream, handle)) => (Some(stream), Some(handle)),
            Err(err) => {
                tracing::warn!(error = %err, "no audio output device, running silent");
                (None, None)
            }
        };

        let sound_enabled = Arc::new(AtomicBool::new(config.sound_enabled));

        let effects = Arc::new(SoundEffectSynthesizer::new(
            output_handle.clone(),
            Arc::clone(&sound_enabled),
        ));
        let sequence = SequenceController::new(
            scheduler,
            effects as Arc<dyn SoundCueSink>,
            events.clone(),
        );

        let music = AudioSourceManager::new(output_handle, events.clone());
        music.set_playback_intent(config.sound_enabled, config.music_playing);

        let voice = VoiceGreetingPlayback::new(events.clone());

        Self {
            music_playing: AtomicBool::new(config.music_playing),
            config,
            events,
            sequence,
            music,
            voice,
            sound_enabled,
            _output: output,
        }
    }

    /// Subscribe to the experience's event stream
    pub fn subscribe(&self) -> (Receiver<Event>, SubscriberId) {
        self.events.subscribe()
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// User "open" gesture
    pub fn open(&self) {
        self.sequence.trigger();
    }

    /// User "replay" gesture: seal the envelope again
    pub fn reset(&self) {
        self.sequence.reset();
    }

    /// Current reveal stage, for rendering
    pub fn stage(&self) -> PresentationState {
        self.sequence.stage()
    }

    /// Master sound toggle; gates both effects and music
    pub fn set_sound_enabled(&self, enabled: bool) {
        self.sound_enabled.store(enabled, Ordering::Relaxed);
        self.music
            .set_playback_intent(enabled, self.music_playing.load(Ordering::Relaxed));
    }

    /// Background music toggle
    pub fn set_music_playing(&self, playing: bool) {
        self.music_playing.store(playing, Ordering::Relaxed);
        self.music
            .set_playback_intent(self.sound_enabled.load(Ordering::Relaxed), playing);
    }

    /// Install an uploaded track as the background music.
    ///
    /// The declared media type is gated here, before the bytes can reach
    /// the source manager: a rejected upload leaves the active source
    /// untouched and surfaces a notice.
    pub fn load_custom_track(&self, media_type: &str, bytes: Vec<u8>) -> Result<(), AudioError> {
        if let Err(err) = validate_media_type(media_type) {
            tracing::warn!(media_type, "custom track rejected");
            self.events.publish(Event::UploadRejected {
                media_type: media_type.to_string(),
            });
            return Err(err);
        }

        self.music.set_custom_source(Some(bytes));
        Ok(())
    }

    /// Drop the custom track, back to the default loop
    pub fn clear_custom_track(&self) {
        self.music.set_custom_source(None);
    }

    /// Which background track is active
    pub fn active_track(&self) -> SourceKind {
        self.music.active_source()
    }

    /// Play the voice greeting for the configured recipient
    pub fn play_greeting(&self) {
        self.voice.play(&self.config.recipient_name);
    }

    /// Whether the greeting is in flight, for control disablement
    pub fn greeting_in_progress(&self) -> bool {
        self.voice.is_playing()
    }

    /// The music source manager, for collaborators that read its state
    pub fn music(&self) -> &AudioSourceManager {
        &self.music
    }
}
