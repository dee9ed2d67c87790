use std::time::Duration;

use crate::audio::RecorderConfig;
use crate::capture::OrchestratorConfig;
use crate::store::LateWritePolicy;

/// Configuration for one presentation capture session
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Unique session identifier
    pub session_id: String,

    /// Interval between screen samples
    pub sample_interval: Duration,

    /// Delay before the first screen sample
    pub startup_delay: Duration,

    /// Byte-length delta classifying a significant screen change
    pub change_threshold_bytes: usize,

    /// Audio segment rotation interval
    pub segment_duration: Duration,

    /// Minimum encoded segment size worth a transcription request
    pub min_segment_bytes: usize,

    /// Continuous transcription mode (rotate while recording)
    pub continuous: bool,

    /// What to do with results resolving after deactivation
    pub late_writes: LateWritePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            session_id: format!("presentation-{}", uuid::Uuid::new_v4()),
            sample_interval: Duration::from_millis(5000),
            startup_delay: Duration::from_millis(1000),
            change_threshold_bytes: 1000,
            segment_duration: Duration::from_millis(10_000),
            min_segment_bytes: 1000,
            continuous: true,
            late_writes: LateWritePolicy::Accept,
        }
    }
}

impl PipelineConfig {
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            sample_interval: self.sample_interval,
            startup_delay: self.startup_delay,
            change_threshold_bytes: self.change_threshold_bytes,
        }
    }

    pub fn recorder_config(&self) -> RecorderConfig {
        RecorderConfig {
            segment_duration: self.segment_duration,
            min_segment_bytes: self.min_segment_bytes,
            continuous: self.continuous,
        }
    }
}
