/// Cue scheduling
///
/// The sequencer never touches wall-clock timers directly; it schedules
/// through this trait so tests can drive the timeline with a virtual clock.
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;

/// Deferred execution of cue callbacks.
///
/// Implementations must fire callbacks in ascending due order; callbacks
/// scheduled for the same instant fire in submission order.
pub trait CueScheduler: Send + Sync {
    /// Run `callback` once `delay` has elapsed.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>);
}

struct TimerEntry {
    due: Instant,
    seq: u64,
    callback: Box<dyn FnOnce() + Send>,
}

/// Wall-clock scheduler backed by a single worker thread.
///
/// A single worker guarantees the ascending-order contract: it always sleeps
/// toward the earliest pending entry and runs entries one at a time.
pub struct TimerScheduler {
    tx: Sender<TimerEntry>,
    next_seq: AtomicU64,
}

impl TimerScheduler {
    /// Create the scheduler and start its worker thread
    pub fn new() -> Self {
        let (tx, rx) = unbounded::<TimerEntry>();

        thread::spawn(move || {
            let mut pending: Vec<TimerEntry> = Vec::new();

            loop {
                let Some(idx) = earliest(&pending) else {
                    match rx.recv() {
                        Ok(entry) => pending.push(entry),
                        Err(_) => break,
                    }
                    continue;
                };

                let now = Instant::now();
                if pending[idx].due <= now {
                    let entry = pending.swap_remove(idx);
                    (entry.callback)();
                    continue;
                }

                let timeout = pending[idx].due - now;
                match rx.recv_timeout(timeout) {
                    Ok(entry) => pending.push(entry),
                    Err(RecvTimeoutError::Timeout) => {
                        let entry = pending.swap_remove(idx);
                        (entry.callback)();
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        tracing::debug!(
                            dropped = pending.len(),
                            "timer scheduler dropped with pending cues"
                        );
                        break;
                    }
                }
            }
        });

        Self {
            tx,
            next_seq: AtomicU64::new(0),
        }
    }
}

/// Index of the entry that must fire first (earliest due, then submission order)
fn earliest(pending: &[TimerEntry]) -> Option<usize> {
    pending
        .iter()
        .enumerate()
        .min_by_key(|(_, e)| (e.due, e.seq))
        .map(|(idx, _)| idx)
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl CueScheduler for TimerScheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) {
        let entry = TimerEntry {
            due: Instant::now() + delay,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            callback,
        };

        // Send fails only if the worker is gone (scheduler being torn down)
        let _ = self.tx.send(entry);
    }
}

struct ManualEntry {
    due_ms: u64,
    seq: u64,
    callback: Box<dyn FnOnce() + Send>,
}

struct ManualInner {
    now_ms: u64,
    next_seq: u64,
    pending: Vec<ManualEntry>,
}

/// Virtual-clock scheduler for deterministic tests.
///
/// Time only moves when `advance()` is called; due callbacks run inline on
/// the advancing thread, in due order, before `advance()` returns.
pub struct ManualScheduler {
    inner: Mutex<ManualInner>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ManualInner {
                now_ms: 0,
                next_seq: 0,
                pending: Vec::new(),
            }),
        }
    }

    /// Move virtual time forward, running every callback that falls due.
    pub fn advance(&self, delta: Duration) {
        let target_ms = self.inner.lock().now_ms + delta.as_millis() as u64;

        loop {
            // Take one due entry per iteration; callbacks run outside the
            // lock so they are free to schedule further cues.
            let callback = {
                let mut inner = self.inner.lock();
                let due_idx = inner
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.due_ms <= target_ms)
                    .min_by_key(|(_, e)| (e.due_ms, e.seq))
                    .map(|(idx, _)| idx);

                match due_idx {
                    Some(idx) => {
                        let entry = inner.pending.remove(idx);
                        inner.now_ms = inner.now_ms.max(entry.due_ms);
                        entry.callback
                    }
                    None => {
                        inner.now_ms = target_ms;
                        break;
                    }
                }
            };

            callback();
        }
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.inner.lock().now_ms
    }

    /// Number of callbacks not yet due
    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending.len()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl CueScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) {
        let mut inner = self.inner.lock();
        let entry = ManualEntry {
            due_ms: inner.now_ms + delay.as_millis() as u64,
            seq: inner.next_seq,
            callback,
        };
        inner.next_seq += 1;
        inner.pending.push(entry);
    }
}
