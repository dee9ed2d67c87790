//! Screen capture orchestration
//!
//! Samples the shared screen on a fixed interval, classifies significant
//! changes with a byte-length delta heuristic, and dispatches text
//! recognition and vision analysis as fire-and-forget jobs that write
//! their results back to the store whenever they resolve.

mod orchestrator;
mod source;

pub use orchestrator::{CaptureOrchestrator, OrchestratorConfig};
pub use source::ScreenSource;
