//! Pipeline wiring and lifecycle
//!
//! `PresentationPipeline` owns the store and both producers (screen
//! orchestrator, segment recorder) and drives them through a single
//! activation flag: false -> true starts capture, true -> false stops
//! scheduling of new samples and rotations and releases device streams.
//! Already-dispatched recognition, analysis and transcription jobs run
//! to completion; the store's late-write policy decides what happens to
//! their results.

mod config;
mod events;
mod pipeline;
mod stats;

pub use config::PipelineConfig;
pub use events::{NoopEvents, PipelineEvents};
pub use pipeline::PresentationPipeline;
pub use stats::PipelineStats;
