use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::watch;
use tracing::debug;

/// Raw output of a text extraction pass
#[derive(Debug, Clone)]
pub struct RecognitionOutcome {
    /// Extracted text, whitespace-trimmed
    pub text: String,
    /// Engine confidence, 0.0 to 100.0
    pub confidence: f32,
}

/// Extraction result with timing attached by the single-flight wrapper
#[derive(Debug, Clone)]
pub struct RecognitionResult {
    pub text: String,
    pub confidence: f32,
    pub processing_time: Duration,
}

/// Text recognition engine contract
///
/// Implementations report progress 0-100 through the provided channel
/// while the extraction runs.
#[async_trait::async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn extract(
        &self,
        image: &[u8],
        progress: &watch::Sender<u8>,
    ) -> Result<RecognitionOutcome>;
}

/// Single-flight guard around a `TextRecognizer`
///
/// Recognition is CPU-heavy; concurrent jobs would pile up behind bursty
/// screen changes. While one extraction is unresolved, further calls
/// return `Ok(None)` immediately with no work started.
pub struct SingleFlightRecognizer {
    inner: std::sync::Arc<dyn TextRecognizer>,
    in_flight: AtomicBool,
    progress: watch::Sender<u8>,
}

impl SingleFlightRecognizer {
    pub fn new(inner: std::sync::Arc<dyn TextRecognizer>) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            inner,
            in_flight: AtomicBool::new(false),
            progress,
        }
    }

    /// Progress side channel, 0-100 during an extraction
    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run an extraction unless one is already in flight
    pub async fn extract(&self, image: &[u8]) -> Result<Option<RecognitionResult>> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("recognition already in progress, dropping request");
            return Ok(None);
        }

        let started = Instant::now();
        let outcome = self.inner.extract(image, &self.progress).await;

        self.progress.send_replace(0);
        self.in_flight.store(false, Ordering::SeqCst);

        let outcome = outcome?;
        let processing_time = started.elapsed();
        debug!(
            elapsed_ms = processing_time.as_millis() as u64,
            confidence = outcome.confidence,
            "recognition complete"
        );

        Ok(Some(RecognitionResult {
            text: outcome.text,
            confidence: outcome.confidence,
            processing_time,
        }))
    }
}
