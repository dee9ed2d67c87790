use anyhow::{Context, Result};
use hound::WavReader;
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};

/// A fully decoded WAV file
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path).context("Failed to open WAV file")?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }
}

/// File-backed audio backend for tests and batch processing
///
/// Emits the file's samples as frames at the configured buffering
/// granularity, as fast as the receiver consumes them.
pub struct WavFileBackend {
    path: String,
    config: AudioBackendConfig,
    task: Option<JoinHandle<()>>,
}

impl WavFileBackend {
    pub fn new(path: impl Into<String>, config: AudioBackendConfig) -> Self {
        Self {
            path: path.into(),
            config,
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for WavFileBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let audio = AudioFile::open(&self.path)?;
        let samples_per_frame = (audio.sample_rate as u64
            * audio.channels as u64
            * self.config.buffer_duration_ms
            / 1000) as usize;
        let frame_duration_ms = self.config.buffer_duration_ms;

        let (tx, rx) = mpsc::channel(16);

        let task = tokio::spawn(async move {
            let mut timestamp_ms = 0u64;
            for chunk in audio.samples.chunks(samples_per_frame.max(1)) {
                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate: audio.sample_rate,
                    channels: audio.channels,
                    timestamp_ms,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
                timestamp_ms += frame_duration_ms;
            }
        });

        self.task = Some(task);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn name(&self) -> &str {
        "wav-file"
    }
}
