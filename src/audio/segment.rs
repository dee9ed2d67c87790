use std::io::Cursor;

use anyhow::{Context, Result};

use super::backend::AudioFrame;

/// One rotated recording segment, ready for a transcription request
///
/// Transient: never stored, exists only for the duration of one call.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Accumulates PCM frames and encodes them into WAV segments in memory
///
/// The encoder adopts the format of the first frame it sees after each
/// flush; frames are assumed format-stable within one segment.
pub struct SegmentEncoder {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl SegmentEncoder {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            sample_rate: 16000,
            channels: 1,
        }
    }

    pub fn push(&mut self, frame: &AudioFrame) {
        if self.samples.is_empty() {
            self.sample_rate = frame.sample_rate;
            self.channels = frame.channels;
        }
        self.samples.extend_from_slice(&frame.samples);
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn buffered_samples(&self) -> usize {
        self.samples.len()
    }

    /// Encode everything buffered so far into one WAV segment and reset
    ///
    /// Returns `None` when nothing was buffered.
    pub fn take_segment(&mut self) -> Result<Option<AudioSegment>> {
        if self.samples.is_empty() {
            return Ok(None);
        }

        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut bytes = Vec::new();
        {
            let cursor = Cursor::new(&mut bytes);
            let mut writer =
                hound::WavWriter::new(cursor, spec).context("Failed to create WAV writer")?;
            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample")?;
            }
            writer.finalize().context("Failed to finalize WAV data")?;
        }

        self.samples.clear();

        Ok(Some(AudioSegment {
            bytes,
            mime_type: "audio/wav".to_string(),
        }))
    }
}

impl Default for SegmentEncoder {
    fn default() -> Self {
        Self::new()
    }
}
