/// Voice greeting playback
///
/// Plays the one embedded greeting clip, single-flight: a play request while
/// a greeting is in flight is ignored, never queued. The recipient name is
/// announce-only; it does not change the clip.
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use rodio::{Decoder, OutputStream, Sink};

use crate::error::VoiceError;
use crate::messaging::{Event, EventBus};

/// Embedded fixed greeting clip
pub const GREETING_CLIP: &[u8] = include_bytes!("../../assets/voice-greeting.wav");

/// Blocking playback routine; the backend seam exists so tests can swap in
/// a deterministic stand-in for the audio device.
pub type PlaybackBackend = dyn Fn(&'static [u8]) -> Result<(), VoiceError> + Send + Sync;

pub struct VoiceGreetingPlayback {
    playing: Arc<AtomicBool>,
    events: EventBus,
    backend: Arc<PlaybackBackend>,
}

impl VoiceGreetingPlayback {
    pub fn new(events: EventBus) -> Self {
        Self::with_backend(events, Arc::new(play_clip_blocking))
    }

    /// Construct with an alternate playback backend
    pub fn with_backend(events: EventBus, backend: Arc<PlaybackBackend>) -> Self {
        Self {
            playing: Arc::new(AtomicBool::new(false)),
            events,
            backend,
        }
    }

    /// Whether a greeting is currently in flight, for control disablement
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Play the greeting for `recipient_name`.
    ///
    /// Single-flight: if a greeting is already playing this is a no-op.
    /// Playback runs on its own thread; completion or failure resets the
    /// state to idle before the outcome event is published, so the caller
    /// may retry the moment the notice arrives.
    pub fn play(&self, recipient_name: &str) {
        if self
            .playing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("greeting already in flight, request ignored");
            return;
        }

        tracing::info!(recipient = recipient_name, "playing voice greeting");
        self.events.publish(Event::VoiceGreetingStarted {
            recipient: recipient_name.to_string(),
        });

        let playback = self.clone();
        let spawned = thread::Builder::new()
            .name("voice-greeting".to_string())
            .spawn(move || playback.run());

        if let Err(err) = spawned {
            self.playing.store(false, Ordering::SeqCst);
            tracing::warn!(error = %err, "could not start greeting playback thread");
            self.events.publish(Event::VoiceGreetingFailed {
                message: "could not start playback".to_string(),
            });
        }
    }

    fn run(&self) {
        let result = (self.backend)(GREETING_CLIP);

        // Back to idle first; a retry right after the failure notice is valid
        self.playing.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => {
                tracing::debug!("voice greeting finished");
                self.events.publish(Event::VoiceGreetingFinished);
            }
            Err(err) => {
                tracing::warn!(error = %err, "voice greeting failed");
                self.events.publish(Event::VoiceGreetingFailed {
                    message: err.to_string(),
                });
            }
        }
    }
}

impl Clone for VoiceGreetingPlayback {
    fn clone(&self) -> Self {
        Self {
            playing: Arc::clone(&self.playing),
            events: self.events.clone(),
            backend: Arc::clone(&self.backend),
        }
    }
}

/// Default backend: open the default output device, decode the clip and
/// block until it has played out.
fn play_clip_blocking(clip: &'static [u8]) -> Result<(), VoiceError> {
    let (_stream, handle) =
        OutputStream::try_default().map_err(|e| VoiceError::OutputUnavailable(Box::new(e)))?;
    let decoder =
        Decoder::new(Cursor::new(clip)).map_err(|e| VoiceError::DecodeFailed(Box::new(e)))?;
    let sink = Sink::try_new(&handle).map_err(|e| VoiceError::PlaybackFailed(e.to_string()))?;

    sink.append(decoder);
    sink.sleep_until_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_until_idle(voice: &VoiceGreetingPlayback) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while voice.is_playing() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert!(!voice.is_playing(), "greeting did not finish in time");
    }

    #[test]
    fn test_greeting_clip_is_embedded() {
        assert!(!GREETING_CLIP.is_empty());
        // RIFF/WAVE header
        assert_eq!(&GREETING_CLIP[..4], b"RIFF");
        assert_eq!(&GREETING_CLIP[8..12], b"WAVE");
    }

    #[test]
    fn test_successful_playback_resets_to_idle() {
        let events = EventBus::new();
        let (rx, _id) = events.subscribe();
        let voice = VoiceGreetingPlayback::with_backend(events, Arc::new(|_clip| Ok(())));

        voice.play("Mom");
        wait_until_idle(&voice);

        assert!(matches!(
            rx.try_recv().unwrap(),
            Event::VoiceGreetingStarted { .. }
        ));
        assert!(matches!(rx.try_recv().unwrap(), Event::VoiceGreetingFinished));
    }

    #[test]
    fn test_failure_surfaces_notice_and_resets() {
        let events = EventBus::new();
        let (rx, _id) = events.subscribe();
        let voice = VoiceGreetingPlayback::with_backend(
            events,
            Arc::new(|_clip| Err(VoiceError::PlaybackFailed("no device".to_string()))),
        );

        voice.play("Mom");
        wait_until_idle(&voice);

        assert!(matches!(
            rx.try_recv().unwrap(),
            Event::VoiceGreetingStarted { .. }
        ));
        match rx.try_recv().unwrap() {
            Event::VoiceGreetingFailed { message } => {
                assert!(message.contains("no device"));
            }
            other => panic!("unexpected event: {:?}", other),
        }

        // State already reset; an immediate retry goes through
        voice.play("Mom");
        wait_until_idle(&voice);
    }

    #[test]
    fn test_single_flight_rejects_concurrent_play() {
        let events = EventBus::new();
        let (rx, _id) = events.subscribe();

        let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);
        let voice = VoiceGreetingPlayback::with_backend(
            events,
            Arc::new(move |_clip| {
                // Hold the greeting in flight until the test releases it
                let _ = gate_rx.recv();
                Ok(())
            }),
        );

        voice.play("Mom");
        let deadline = Instant::now() + Duration::from_secs(2);
        while !voice.is_playing() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert!(voice.is_playing());

        // Second request while playing: ignored, not queued
        voice.play("Mom");

        gate_tx.send(()).unwrap();
        wait_until_idle(&voice);

        // Exactly one started/finished pair
        let mut started = 0;
        let mut finished = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::VoiceGreetingStarted { .. } => started += 1,
                Event::VoiceGreetingFinished => finished += 1,
                other => panic!("unexpected event: {:?}", other),
            }
        }
        assert_eq!(started, 1);
        assert_eq!(finished, 1);
    }
}
