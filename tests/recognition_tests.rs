// Tests for the single-flight recognition wrapper
//
// Recognition is CPU-heavy; while one extraction is unresolved a second
// request must be dropped immediately, not queued behind the first.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{watch, Notify};
use viva_capture::recognition::{RecognitionOutcome, SingleFlightRecognizer, TextRecognizer};

/// Recognizer that blocks until released through a Notify
struct GatedRecognizer {
    gate: Arc<Notify>,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl TextRecognizer for GatedRecognizer {
    async fn extract(
        &self,
        _image: &[u8],
        progress: &watch::Sender<u8>,
    ) -> Result<RecognitionOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        progress.send_replace(50);
        self.gate.notified().await;
        progress.send_replace(100);
        Ok(RecognitionOutcome {
            text: "fn main() in Rust".to_string(),
            confidence: 91.0,
        })
    }
}

async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..100 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn test_concurrent_extract_is_dropped_not_queued() {
    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let recognizer = Arc::new(SingleFlightRecognizer::new(Arc::new(GatedRecognizer {
        gate: Arc::clone(&gate),
        calls: Arc::clone(&calls),
    })));

    let first = {
        let recognizer = Arc::clone(&recognizer);
        tokio::spawn(async move { recognizer.extract(&[1, 2, 3]).await })
    };

    {
        let recognizer = Arc::clone(&recognizer);
        wait_until(move || recognizer.is_processing()).await;
    }

    // Second call returns immediately with no work started
    let second = recognizer.extract(&[4, 5, 6]).await.unwrap();
    assert!(second.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    gate.notify_one();
    let result = first.await.unwrap().unwrap();
    let result = result.expect("first call should produce a result");
    assert_eq!(result.text, "fn main() in Rust");
    assert!((result.confidence - 91.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_available_again_after_completion() {
    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let recognizer = Arc::new(SingleFlightRecognizer::new(Arc::new(GatedRecognizer {
        gate: Arc::clone(&gate),
        calls: Arc::clone(&calls),
    })));

    let first = {
        let recognizer = Arc::clone(&recognizer);
        tokio::spawn(async move { recognizer.extract(&[0]).await })
    };
    {
        let recognizer = Arc::clone(&recognizer);
        wait_until(move || recognizer.is_processing()).await;
    }
    gate.notify_one();
    first.await.unwrap().unwrap();

    // The guard is released; a new extraction starts real work
    let second = {
        let recognizer = Arc::clone(&recognizer);
        tokio::spawn(async move { recognizer.extract(&[0]).await })
    };
    {
        let recognizer = Arc::clone(&recognizer);
        wait_until(move || recognizer.is_processing()).await;
    }
    gate.notify_one();
    assert!(second.await.unwrap().unwrap().is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_progress_side_channel_reports_and_resets() {
    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let recognizer = Arc::new(SingleFlightRecognizer::new(Arc::new(GatedRecognizer {
        gate: Arc::clone(&gate),
        calls,
    })));

    let progress = recognizer.subscribe_progress();
    assert_eq!(*progress.borrow(), 0);

    let task = {
        let recognizer = Arc::clone(&recognizer);
        tokio::spawn(async move { recognizer.extract(&[0]).await })
    };

    {
        let progress = progress.clone();
        wait_until(move || *progress.borrow() == 50).await;
    }

    gate.notify_one();
    task.await.unwrap().unwrap();

    // Progress returns to 0 once the extraction resolves
    assert_eq!(*progress.borrow(), 0);
    assert!(!recognizer.is_processing());
}
