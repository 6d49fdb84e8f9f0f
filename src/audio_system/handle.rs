/// Scoped handle for a user-supplied track
///
/// Makes an in-memory audio binary playable for a bounded lifetime:
/// [creation, supersession-or-teardown]. The owner must call `revoke()` on
/// every exit path; `Drop` is only a leak backstop, never the release
/// mechanism, because the binary's lifetime and the handle's are not the
/// same thing.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Owned, revocable reference to a user-supplied audio binary
pub struct TrackHandle {
    id: u64,
    bytes: Arc<Vec<u8>>,
    revoked: bool,
}

impl TrackHandle {
    pub fn new(bytes: Vec<u8>) -> Self {
        let id = NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, size_bytes = bytes.len(), "custom track handle created");
        Self {
            id,
            bytes: Arc::new(bytes),
            revoked: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Shared view of the underlying binary
    pub fn bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.bytes)
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Release the handle. Consumes it; the release happens at most once
    /// even though `Drop` also runs afterwards.
    pub fn revoke(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.revoked {
            self.revoked = true;
            tracing::debug!(id = self.id, "custom track handle revoked");
        }
    }
}

impl Drop for TrackHandle {
    fn drop(&mut self) {
        if !self.revoked {
            tracing::warn!(id = self.id, "track handle dropped without revoke, releasing");
            self.release();
        }
    }
}
