/// Procedural sound-effect synthesis
///
/// Each effect is described by an immutable descriptor (frequency path plus
/// gain envelope) and rendered to a fresh sample buffer on every play. A
/// fresh buffer and a fresh detached sink per call means two overlapping
/// effects never share state and neither can truncate the other. No pooling:
/// the effects are short and rare, a new graph per call is the intended
/// trade-off.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStreamHandle, Sink};

use crate::sequence::{SoundCueSink, SoundEffect};

/// Render sample rate for synthesized effects
pub const SAMPLE_RATE: u32 = 44_100;

/// How the oscillator moves between the points of a frequency path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyGlide {
    /// Exponential ramp from each point to the next (smooth sweep)
    Exponential,

    /// Hold each frequency until the next point (stepped arpeggio)
    Step,
}

/// Immutable synthesis spec for one effect
#[derive(Debug, Clone, Copy)]
pub struct SoundEffectDescriptor {
    /// (offset_ms, frequency_hz) waypoints, ascending offsets
    pub frequency_path: &'static [(u64, f32)],
    pub glide: FrequencyGlide,
    pub start_gain: f32,
    pub decay_target: f32,
    pub decay_ms: u64,
    pub duration_ms: u64,
}

/// Low whoosh: 200 Hz sweeping down to 100 Hz over half a second
pub const ENVELOPE_OPEN: SoundEffectDescriptor = SoundEffectDescriptor {
    frequency_path: &[(0, 200.0), (500, 100.0)],
    glide: FrequencyGlide::Exponential,
    start_gain: 0.3,
    decay_target: 0.01,
    decay_ms: 500,
    duration_ms: 500,
};

/// Rising chime: A4, C#5, E5 steps under a longer decay
pub const CARD_REVEAL: SoundEffectDescriptor = SoundEffectDescriptor {
    frequency_path: &[(0, 440.0), (100, 554.37), (200, 659.25)],
    glide: FrequencyGlide::Step,
    start_gain: 0.2,
    decay_target: 0.01,
    decay_ms: 800,
    duration_ms: 800,
};

impl SoundEffectDescriptor {
    pub fn for_effect(effect: SoundEffect) -> &'static SoundEffectDescriptor {
        match effect {
            SoundEffect::EnvelopeOpen => &ENVELOPE_OPEN,
            SoundEffect::CardReveal => &CARD_REVEAL,
        }
    }

    /// Oscillator frequency at `t_ms` into the effect
    fn frequency_at(&self, t_ms: f64) -> f64 {
        let path = self.frequency_path;
        let last = path[path.len() - 1];
        if t_ms >= last.0 as f64 {
            return last.1 as f64;
        }

        match self.glide {
            FrequencyGlide::Step => {
                let mut current = path[0].1 as f64;
                for &(offset, hz) in path {
                    if t_ms >= offset as f64 {
                        current = hz as f64;
                    }
                }
                current
            }
            FrequencyGlide::Exponential => {
                for pair in path.windows(2) {
                    let (t0, f0) = (pair[0].0 as f64, pair[0].1 as f64);
                    let (t1, f1) = (pair[1].0 as f64, pair[1].1 as f64);
                    if t_ms >= t0 && t_ms < t1 {
                        let u = (t_ms - t0) / (t1 - t0);
                        return f0 * (f1 / f0).powf(u);
                    }
                }
                path[0].1 as f64
            }
        }
    }

    /// Gain envelope at `t_ms`: exponential decay from `start_gain` to
    /// `decay_target` over `decay_ms`, then held at the target.
    fn gain_at(&self, t_ms: f64) -> f64 {
        let start = self.start_gain as f64;
        let target = self.decay_target as f64;
        if t_ms >= self.decay_ms as f64 {
            return target;
        }
        let u = t_ms / self.decay_ms as f64;
        start * (target / start).powf(u)
    }
}

/// Render a descriptor to mono f32 samples. Pure function: every call
/// produces an independent buffer.
pub fn render(descriptor: &SoundEffectDescriptor, sample_rate: u32) -> Vec<f32> {
    let total = (sample_rate as u64 * descriptor.duration_ms / 1000) as usize;
    let mut samples = Vec::with_capacity(total);

    // Phase accumulation keeps the waveform continuous across frequency
    // changes, avoiding clicks at the path waypoints.
    let mut phase = 0.0f64;
    for i in 0..total {
        let t_ms = i as f64 * 1000.0 / sample_rate as f64;
        let freq = descriptor.frequency_at(t_ms);
        let gain = descriptor.gain_at(t_ms);
        phase += 2.0 * std::f64::consts::PI * freq / sample_rate as f64;
        samples.push((phase.sin() * gain) as f32);
    }

    samples
}

/// On-demand synthesizer for the sequencer's sound cues
pub struct SoundEffectSynthesizer {
    output: Option<OutputStreamHandle>,
    sound_enabled: Arc<AtomicBool>,
}

impl SoundEffectSynthesizer {
    /// `output` is `None` when no audio device exists; effects are
    /// decorative, so that just turns every play into a no-op.
    pub fn new(output: Option<OutputStreamHandle>, sound_enabled: Arc<AtomicBool>) -> Self {
        Self {
            output,
            sound_enabled,
        }
    }
}

impl SoundCueSink for SoundEffectSynthesizer {
    fn play(&self, effect: SoundEffect) {
        if !self.sound_enabled.load(Ordering::Relaxed) {
            return;
        }

        let Some(output) = &self.output else {
            tracing::debug!(%effect, "no audio output, skipping sound effect");
            return;
        };

        let descriptor = SoundEffectDescriptor::for_effect(effect);
        let samples = render(descriptor, SAMPLE_RATE);
        let buffer = SamplesBuffer::new(1, SAMPLE_RATE, samples);

        match Sink::try_new(output) {
            Ok(sink) => {
                tracing::debug!(%effect, duration_ms = descriptor.duration_ms, "playing sound effect");
                sink.append(buffer);
                // Detach: the effect plays itself out, independent of this
                // call and of any other effect in flight
                sink.detach();
            }
            Err(err) => {
                tracing::debug!(%effect, error = %err, "sound effect rejected, dropping");
            }
        }
    }
}
