/// Background-music source manager
///
/// Owns the active track (default vs. custom), the handle backing a custom
/// track, and the playback sink. Only this component may create or revoke
/// track handles.
use std::io::Cursor;

use parking_lot::Mutex;
use rodio::{Decoder, OutputStreamHandle, Sink, Source};

use crate::error::AudioError;
use crate::messaging::{Event, EventBus};

use super::handle::TrackHandle;
use super::source::{ActiveTrack, PlaybackIntent, SourceKind};

/// Embedded default background loop
pub const DEFAULT_TRACK: &[u8] = include_bytes!("../../assets/default-track.wav");

struct ActiveSink {
    sink: Sink,

    /// Custom-handle id the sink was built from; `None` means default track.
    /// Lets us tell whether an intent change can reuse the sink or the
    /// source switched underneath it.
    track_id: Option<u64>,
}

struct ManagerInner {
    output: Option<OutputStreamHandle>,
    sink: Option<ActiveSink>,
    track: ActiveTrack,
    intent: PlaybackIntent,

    // Handle accounting. The scoped-resource contract requires every
    // created handle to be revoked exactly once; these counters prove it.
    handles_created: u64,
    handles_revoked: u64,
}

pub struct AudioSourceManager {
    inner: Mutex<ManagerInner>,
    events: EventBus,
}

impl AudioSourceManager {
    /// Create a manager. `output` is `None` in environments without an
    /// audio device; source selection and handle lifecycle still work,
    /// playback attempts are silently dropped.
    pub fn new(output: Option<OutputStreamHandle>, events: EventBus) -> Self {
        Self {
            inner: Mutex::new(ManagerInner {
                output,
                sink: None,
                track: ActiveTrack::Default,
                intent: PlaybackIntent::default(),
                handles_created: 0,
                handles_revoked: 0,
            }),
            events,
        }
    }

    /// Install a custom track, or clear back to the default with `None`.
    ///
    /// The superseded handle is revoked exactly once, and the playback sink
    /// is stopped before the new track can start, so two tracks never play
    /// at the same time.
    pub fn set_custom_source(&self, binary: Option<Vec<u8>>) {
        let notice = {
            let mut inner = self.inner.lock();

            if let Some(active) = inner.sink.take() {
                active.sink.stop();
            }

            let previous = std::mem::take(&mut inner.track);
            let had_custom = previous.is_custom();
            if let ActiveTrack::Custom(handle) = previous {
                inner.handles_revoked += 1;
                handle.revoke();
            }

            let notice = match binary {
                Some(bytes) => {
                    let size_bytes = bytes.len();
                    let handle = TrackHandle::new(bytes);
                    inner.handles_created += 1;
                    tracing::info!(id = handle.id(), size_bytes, "custom track installed");
                    inner.track = ActiveTrack::Custom(handle);
                    Some(Event::CustomTrackLoaded { size_bytes })
                }
                None => {
                    if had_custom {
                        tracing::info!("custom track cleared, back to default");
                        Some(Event::CustomTrackCleared)
                    } else {
                        None
                    }
                }
            };

            Self::apply_intent(&mut inner);
            notice
        };

        if let Some(event) = notice {
            self.events.publish(event);
        }
    }

    /// Push the externally owned toggles and resolve effective playback.
    pub fn set_playback_intent(&self, sound_enabled: bool, music_playing: bool) {
        let (was_playing, now_playing) = {
            let mut inner = self.inner.lock();
            let was_playing = inner.intent.should_play();
            inner.intent = PlaybackIntent::new(sound_enabled, music_playing);
            Self::apply_intent(&mut inner);
            (was_playing, inner.intent.should_play())
        };

        if was_playing != now_playing {
            self.events.publish(Event::MusicStateChanged {
                playing: now_playing,
            });
        }
    }

    /// Current playback intent
    pub fn intent(&self) -> PlaybackIntent {
        self.inner.lock().intent
    }

    /// Which track is active
    pub fn active_source(&self) -> SourceKind {
        self.inner.lock().track.kind()
    }

    /// Handle accounting: (created, revoked). While a custom track is
    /// installed `created == revoked + 1`, otherwise the two are equal.
    pub fn handle_stats(&self) -> (u64, u64) {
        let inner = self.inner.lock();
        (inner.handles_created, inner.handles_revoked)
    }

    /// Pause or (re)start playback according to the stored intent.
    fn apply_intent(inner: &mut ManagerInner) {
        if inner.intent.should_play() {
            Self::ensure_playing(inner);
        } else if let Some(active) = &inner.sink {
            active.sink.pause();
        }
    }

    /// Make the active track audible. A sink built from the current track
    /// is resumed; otherwise the old sink is discarded and a new one built.
    /// Environment rejections are dropped here: the next explicit intent
    /// change retries naturally.
    fn ensure_playing(inner: &mut ManagerInner) {
        let want_id = inner.track.custom_id();

        if let Some(active) = &inner.sink {
            if active.track_id == want_id {
                active.sink.play();
                return;
            }
        }

        if let Some(stale) = inner.sink.take() {
            stale.sink.stop();
        }

        let bytes = match &inner.track {
            ActiveTrack::Default => DEFAULT_TRACK.to_vec(),
            ActiveTrack::Custom(handle) => (*handle.bytes()).clone(),
        };

        match Self::build_sink(inner.output.as_ref(), bytes) {
            Ok(sink) => {
                inner.sink = Some(ActiveSink {
                    sink,
                    track_id: want_id,
                });
            }
            Err(err) => {
                tracing::debug!(error = %err, "background playback rejected, dropping");
            }
        }
    }

    /// Build a looping sink for the given track bytes.
    fn build_sink(output: Option<&OutputStreamHandle>, bytes: Vec<u8>) -> Result<Sink, AudioError> {
        let output = output.ok_or(AudioError::OutputUnavailable)?;

        let decoder =
            Decoder::new(Cursor::new(bytes)).map_err(|e| AudioError::DecodeFailed(Box::new(e)))?;
        let sink = Sink::try_new(output).map_err(|e| AudioError::PlaybackFailed(Box::new(e)))?;

        // The background track loops until paused or replaced
        sink.append(decoder.repeat_infinite());
        sink.play();
        Ok(sink)
    }
}

impl Drop for AudioSourceManager {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();

        if let Some(active) = inner.sink.take() {
            active.sink.stop();
        }

        // Teardown revokes the final live handle
        if let ActiveTrack::Custom(handle) = std::mem::take(&mut inner.track) {
            inner.handles_revoked += 1;
            handle.revoke();
        }
    }
}
