//! Shared capture state store
//!
//! Single aggregation point for everything the pipeline produces:
//! - screen captures (bounded window of the 30 most recent)
//! - capture log entries (bounded window of the 50 most recent)
//! - the accumulated speech transcript
//! - the set of detected technologies
//!
//! All producers write through `CaptureStore`; all readers observe
//! immutable `CaptureState` snapshots.

mod state;
mod store;

pub use state::{
    excerpt, CaptureLogEntry, CaptureState, LogKind, ScreenCapture, MAX_CAPTURE_LOGS,
    MAX_SCREEN_CAPTURES,
};
pub use store::{CaptureStore, LateWritePolicy};
