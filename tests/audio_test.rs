// Integration tests for the audio subsystem: upload gating, the custom
// track's handle lifecycle, intent resolution, and effect synthesis. All of
// these run without an audio device; playback attempts degrade to no-ops.

use std::sync::Arc;

use envelope_surprise::audio_system::synth::{self, CARD_REVEAL, ENVELOPE_OPEN, SAMPLE_RATE};
use envelope_surprise::audio_system::{
    validate_media_type, AudioSourceManager, SourceKind, TrackHandle, VoiceGreetingPlayback,
};
use envelope_surprise::messaging::{Event, EventBus};
use envelope_surprise::sequence::ManualScheduler;
use envelope_surprise::{AudioError, CardConfig, CardExperience, VoiceError};

fn experience() -> CardExperience {
    CardExperience::with_scheduler(CardConfig::default(), Arc::new(ManualScheduler::new()))
}

#[test]
fn non_audio_upload_is_rejected_and_source_unchanged() {
    let exp = experience();
    let (events, _id) = exp.subscribe();

    // Load a valid custom track first
    exp.load_custom_track("audio/wav", vec![0; 32]).unwrap();
    assert_eq!(exp.active_track(), SourceKind::Custom);
    let stats_before = exp.music().handle_stats();

    // The bad upload must not reach the source manager
    let err = exp.load_custom_track("image/png", vec![1, 2, 3]).unwrap_err();
    assert!(matches!(err, AudioError::InvalidFormat { .. }));
    assert_eq!(exp.active_track(), SourceKind::Custom);
    assert_eq!(exp.music().handle_stats(), stats_before);

    let mut saw_rejection = false;
    while let Ok(event) = events.try_recv() {
        if let Event::UploadRejected { media_type } = event {
            assert_eq!(media_type, "image/png");
            saw_rejection = true;
        }
    }
    assert!(saw_rejection, "rejection notice was not published");
}

#[test]
fn media_type_gate_accepts_only_audio() {
    for ok in ["audio/mpeg", "audio/ogg", "Audio/WAV"] {
        assert!(validate_media_type(ok).is_ok(), "{ok} should pass");
    }
    for bad in ["video/mp4", "text/plain", "application/octet-stream", ""] {
        assert!(validate_media_type(bad).is_err(), "{bad} should fail");
    }
}

#[test]
fn superseding_uploads_revoke_exactly_once() {
    let manager = AudioSourceManager::new(None, EventBus::new());

    manager.set_custom_source(Some(vec![b'A'; 100]));
    assert_eq!(manager.handle_stats(), (1, 0));

    // B supersedes A: A's handle revoked at the moment B becomes active
    manager.set_custom_source(Some(vec![b'B'; 100]));
    assert_eq!(manager.handle_stats(), (2, 1));
    assert_eq!(manager.active_source(), SourceKind::Custom);

    // Teardown revokes the final live handle
    drop(manager);
}

#[test]
fn intent_pairs_resolve_per_contract() {
    let exp = experience();

    exp.set_sound_enabled(false);
    exp.set_music_playing(true);
    assert!(!exp.music().intent().should_play(), "(false, true) pauses");

    exp.set_sound_enabled(true);
    assert!(exp.music().intent().should_play(), "(true, true) plays");

    // With a custom source present, the custom track is what plays
    exp.load_custom_track("audio/mpeg", vec![0; 8]).unwrap();
    assert_eq!(exp.active_track(), SourceKind::Custom);
    assert!(exp.music().intent().should_play());
}

#[test]
fn track_handle_is_scoped() {
    let handle = TrackHandle::new(vec![1, 2, 3, 4]);
    assert!(!handle.is_revoked());
    assert_eq!(handle.len(), 4);
    handle.revoke();
}

#[test]
fn overlapping_effect_renders_are_full_length() {
    // Two cues 50ms apart each own their whole envelope; verify the renders
    // are complete and deterministic rather than shared or truncated.
    let open = synth::render(&ENVELOPE_OPEN, SAMPLE_RATE);
    let reveal = synth::render(&CARD_REVEAL, SAMPLE_RATE);

    assert_eq!(open.len() as u64, 500 * SAMPLE_RATE as u64 / 1000);
    assert_eq!(reveal.len() as u64, 800 * SAMPLE_RATE as u64 / 1000);

    assert_eq!(synth::render(&ENVELOPE_OPEN, SAMPLE_RATE), open);
    assert_eq!(synth::render(&CARD_REVEAL, SAMPLE_RATE), reveal);
}

#[test]
fn voice_greeting_single_flight_and_recovery() {
    let bus = EventBus::new();
    let (events, _id) = bus.subscribe();

    let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);
    let voice = VoiceGreetingPlayback::with_backend(
        bus,
        Arc::new(move |_clip| {
            let _ = gate_rx.recv();
            Err(VoiceError::PlaybackFailed("asset missing".to_string()))
        }),
    );

    voice.play("Mom");
    assert!(voice.is_playing());

    // Second request while playing is ignored, not queued
    voice.play("Mom");

    gate_tx.send(()).unwrap();
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
    while voice.is_playing() && std::time::Instant::now() < deadline {
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
    assert!(!voice.is_playing());

    let mut started = 0;
    let mut failed = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            Event::VoiceGreetingStarted { recipient } => {
                assert_eq!(recipient, "Mom");
                started += 1;
            }
            Event::VoiceGreetingFailed { message } => {
                assert!(message.contains("asset missing"));
                failed += 1;
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
    assert_eq!(started, 1, "single-flight: exactly one playback started");
    assert_eq!(failed, 1);

    // Failure reset the state; the next request is accepted
    voice.play("Mom");
    assert!(voice.is_playing());
}
