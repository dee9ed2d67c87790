use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::clients::{GroqTranscriptionClient, GroqVisionClient};
use crate::pipeline::PipelineConfig;
use crate::store::LateWritePolicy;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub services: RemoteServicesConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "viva-capture".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    /// Interval between screen samples in milliseconds
    pub sample_interval_ms: u64,
    /// Delay before the first sample in milliseconds
    pub startup_delay_ms: u64,
    /// Byte-length delta classifying a significant change
    pub change_threshold_bytes: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 5000,
            startup_delay_ms: 1000,
            change_threshold_bytes: 1000,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    /// Segment rotation interval in milliseconds
    pub segment_duration_ms: u64,
    /// Minimum encoded segment size worth transcribing
    pub min_segment_bytes: usize,
    /// Continuous transcription mode
    pub continuous: bool,
    /// Target sample rate for capture backends
    pub sample_rate: u32,
    /// Target channel count
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            segment_duration_ms: 10_000,
            min_segment_bytes: 1000,
            continuous: true,
            sample_rate: 16000,
            channels: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoteServicesConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Override for the transcription endpoint
    pub transcription_url: Option<String>,
    /// Override for the vision endpoint
    pub vision_url: Option<String>,
}

impl Default for RemoteServicesConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GROQ_API_KEY".to_string(),
            transcription_url: None,
            vision_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub late_writes: LateWritePolicy,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Build the transcription client from the `[services]` settings
    ///
    /// The API key is resolved through the configured environment
    /// variable; a missing key is an error, not a silent no-op.
    pub fn transcription_client(&self) -> Result<GroqTranscriptionClient> {
        let mut client = GroqTranscriptionClient::new(self.api_key()?);
        if let Some(url) = &self.services.transcription_url {
            client = client.with_endpoint(url);
        }
        Ok(client)
    }

    /// Build the vision client from the `[services]` settings
    pub fn vision_client(&self) -> Result<GroqVisionClient> {
        let mut client = GroqVisionClient::new(self.api_key()?);
        if let Some(url) = &self.services.vision_url {
            client = client.with_endpoint(url);
        }
        Ok(client)
    }

    fn api_key(&self) -> Result<String> {
        std::env::var(&self.services.api_key_env)
            .with_context(|| format!("{} is not set", self.services.api_key_env))
    }

    /// Map file settings onto a pipeline configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            sample_interval: Duration::from_millis(self.capture.sample_interval_ms),
            startup_delay: Duration::from_millis(self.capture.startup_delay_ms),
            change_threshold_bytes: self.capture.change_threshold_bytes,
            segment_duration: Duration::from_millis(self.audio.segment_duration_ms),
            min_segment_bytes: self.audio.min_segment_bytes,
            continuous: self.audio.continuous,
            late_writes: self.store.late_writes,
            ..PipelineConfig::default()
        }
    }
}
