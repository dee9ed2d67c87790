use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::Deserialize;
use tracing::debug;

use super::state::{CaptureLogEntry, CaptureState, ScreenCapture};

/// What to do with results that resolve after the store is closed
///
/// Deactivating the pipeline does not cancel in-flight recognition,
/// analysis or transcription calls; their results may arrive after the
/// session has moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LateWritePolicy {
    /// Apply late-arriving writes (consumers tolerate them)
    #[default]
    Accept,
    /// Silently discard writes arriving after `close()`
    Drop,
}

/// Shared, bounded, append-only capture state
///
/// Every operation is a single read-modify-write under one lock with no
/// suspension point inside, so concurrent producers cannot interleave
/// mid-operation and readers always see a complete snapshot.
pub struct CaptureStore {
    state: RwLock<Arc<CaptureState>>,
    closed: AtomicBool,
    late_writes: LateWritePolicy,
}

impl CaptureStore {
    pub fn new(late_writes: LateWritePolicy) -> Self {
        Self {
            state: RwLock::new(Arc::new(CaptureState::default())),
            closed: AtomicBool::new(false),
            late_writes,
        }
    }

    /// Current immutable snapshot
    pub fn snapshot(&self) -> Arc<CaptureState> {
        Arc::clone(&self.state.read().unwrap())
    }

    /// Append a screen capture, truncating to the most recent window
    pub fn push_screen_capture(&self, capture: ScreenCapture) -> bool {
        self.apply(|state| state.with_screen_capture(capture))
    }

    /// Append a log entry, truncating to the most recent window
    pub fn push_log(&self, entry: CaptureLogEntry) -> bool {
        self.apply(|state| state.with_log(entry))
    }

    /// Append transcript text with a single separating space
    pub fn append_transcript(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.apply(|state| state.with_transcript(text))
    }

    /// Add a technology if not already present (idempotent)
    pub fn add_technology(&self, name: &str) -> bool {
        self.apply(|state| state.with_technology(name))
    }

    /// Attach recognized text to the capture it originated from
    pub fn set_capture_recognized_text(&self, capture_id: u64, text: &str) -> bool {
        self.apply(|state| state.with_recognized_text(capture_id, text))
    }

    /// Attach a vision analysis to the capture it originated from
    pub fn set_capture_analysis(&self, capture_id: u64, text: &str) -> bool {
        self.apply(|state| state.with_analysis(capture_id, text))
    }

    /// Mark the session as no longer listening; the late-write policy
    /// decides whether subsequent writes are applied or dropped
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Restore the initial empty state and reopen the store
    pub fn reset(&self) {
        let mut guard = self.state.write().unwrap();
        *guard = Arc::new(CaptureState::default());
        self.closed.store(false, Ordering::SeqCst);
    }

    fn apply<F>(&self, transition: F) -> bool
    where
        F: FnOnce(&CaptureState) -> CaptureState,
    {
        if self.is_closed() && self.late_writes == LateWritePolicy::Drop {
            debug!("store closed, dropping late write");
            return false;
        }

        let mut guard = self.state.write().unwrap();
        let next = transition(&guard);
        *guard = Arc::new(next);
        true
    }
}

impl Default for CaptureStore {
    fn default() -> Self {
        Self::new(LateWritePolicy::default())
    }
}
