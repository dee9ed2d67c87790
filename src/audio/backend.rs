use anyhow::Result;
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since recording started
    pub timestamp_ms: u64,
}

impl AudioFrame {
    /// Frame duration derived from sample count
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}

/// Configuration for a microphone capture backend
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Target sample rate (backends resample if needed)
    pub target_sample_rate: u32,
    /// Target channel count (1 = mono, 2 = stereo)
    pub target_channels: u16,
    /// Frame buffering granularity in milliseconds
    pub buffer_duration_ms: u64,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000, // 16kHz for speech transcription
            target_channels: 1,        // Mono
            buffer_duration_ms: 1000,  // 1s frames feed segment rotation
        }
    }
}

/// Microphone capture backend
///
/// Platform device streams are opaque behind this trait; the embedding
/// application supplies a real device implementation, tests and batch
/// processing use `WavFileBackend` or channel-fed stubs.
#[async_trait::async_trait]
pub trait AudioBackend: Send {
    /// Acquire the device and start capturing
    ///
    /// Returns a channel receiver that will receive audio frames.
    /// Failure here means the device is unavailable or permission was
    /// denied; the recording session does not start.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing and release the device
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}
