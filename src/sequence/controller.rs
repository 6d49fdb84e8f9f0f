/// Reveal sequence controller
///
/// Drives the staged reveal: one trigger plays the authored cue table,
/// one reset cancels whatever is still pending and seals the envelope again.
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::messaging::{Event, EventBus};

use super::cue::{CueStep, SoundEffect, CUE_TABLE};
use super::scheduler::CueScheduler;
use super::stage::PresentationState;

/// Receiver for the sequencer's sound cues.
///
/// Injected at construction so the controller never reaches into ambient
/// state to make noise; tests substitute a recording sink.
pub trait SoundCueSink: Send + Sync {
    fn play(&self, effect: SoundEffect);
}

struct Inner {
    state: PresentationState,

    /// Sequence-instance token. Every scheduled cue captures the generation
    /// it belongs to; `reset()` bumps it, which cancels the whole instance
    /// even for timers that already elapsed but have not executed yet.
    generation: u64,
}

/// Controller for the reveal timeline
pub struct SequenceController {
    inner: Arc<Mutex<Inner>>,
    scheduler: Arc<dyn CueScheduler>,
    cues: Arc<dyn SoundCueSink>,
    events: EventBus,
}

impl SequenceController {
    pub fn new(
        scheduler: Arc<dyn CueScheduler>,
        cues: Arc<dyn SoundCueSink>,
        events: EventBus,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: PresentationState::Closed,
                generation: 0,
            })),
            scheduler,
            cues,
            events,
        }
    }

    /// Current stage, for rendering
    pub fn stage(&self) -> PresentationState {
        self.inner.lock().state
    }

    /// Start the reveal.
    ///
    /// No-op unless the envelope is sealed (double-trigger protection). The
    /// 0 ms step runs inline; the remaining steps are scheduled at their
    /// fixed offsets relative to now.
    pub fn trigger(&self) {
        let generation = {
            let mut inner = self.inner.lock();
            if !inner.state.is_closed() {
                tracing::trace!(stage = %inner.state, "trigger ignored, reveal already running");
                return;
            }
            inner.state = CUE_TABLE[0].stage;
            inner.generation
        };

        tracing::info!("reveal triggered");
        self.announce(CUE_TABLE[0]);

        for step in &CUE_TABLE[1..] {
            let controller = self.clone();
            let step = *step;
            self.scheduler.schedule(
                Duration::from_millis(step.offset_ms),
                Box::new(move || controller.fire(generation, step)),
            );
        }
    }

    /// Seal the envelope again.
    ///
    /// Cancels every cue of the current sequence instance and returns to
    /// `Closed` under one lock, so no cue can interleave between
    /// cancellation and the state change. Idempotent when already closed.
    pub fn reset(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() {
                tracing::trace!("reset ignored, envelope already sealed");
                return;
            }
            inner.generation += 1;
            inner.state = PresentationState::Closed;
        }

        tracing::info!("reveal reset");
        self.events.publish(Event::StageChanged {
            stage: PresentationState::Closed,
        });
    }

    /// Execute a scheduled step, unless its instance was cancelled.
    fn fire(&self, generation: u64, step: CueStep) {
        {
            let mut inner = self.inner.lock();
            if inner.generation != generation {
                tracing::trace!(offset_ms = step.offset_ms, "cue cancelled before execution");
                return;
            }
            inner.state = step.stage;
        }

        self.announce(step);
    }

    /// Publish the stage change and play the step's sound cue, if any.
    /// Runs outside the state lock; sound is decorative and must never
    /// block or abort the timeline.
    fn announce(&self, step: CueStep) {
        tracing::debug!(offset_ms = step.offset_ms, stage = %step.stage, "stage advanced");
        self.events.publish(Event::StageChanged { stage: step.stage });

        if let Some(effect) = step.effect {
            self.cues.play(effect);
        }
    }
}

impl Clone for SequenceController {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            scheduler: Arc::clone(&self.scheduler),
            cues: Arc::clone(&self.cues),
            events: self.events.clone(),
        }
    }
}
