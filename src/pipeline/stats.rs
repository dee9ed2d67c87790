use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a presentation capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Whether the pipeline is currently active
    pub is_active: bool,

    /// When the pipeline was activated, if it ever was
    pub activated_at: Option<DateTime<Utc>>,

    /// Seconds since activation
    pub duration_secs: f64,

    /// Frames sampled from the screen so far
    pub frames_sampled: usize,

    /// Significant changes detected so far
    pub significant_changes: usize,

    /// Audio segments sent for transcription
    pub segments_dispatched: usize,

    /// Audio segments transcribed successfully
    pub segments_transcribed: usize,

    /// Screen captures currently retained in the store window
    pub captures_retained: usize,

    /// Log entries currently retained in the store window
    pub log_entries_retained: usize,

    /// Words accumulated in the transcript
    pub transcript_words: usize,

    /// Unique technologies detected
    pub technologies_detected: usize,
}
