//! Local text recognition
//!
//! The recognition engine itself is a CPU-bound collaborator behind the
//! `TextRecognizer` trait. `SingleFlightRecognizer` enforces that at most
//! one extraction runs at a time; a call issued while one is unresolved
//! is dropped, not queued.

mod engine;
pub mod technologies;

pub use engine::{RecognitionOutcome, RecognitionResult, SingleFlightRecognizer, TextRecognizer};
pub use technologies::extract_technologies;
