use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::source::ScreenSource;
use crate::clients::{VisionAnalysisClient, SCREEN_ANALYZER_PROMPT};
use crate::pipeline::PipelineEvents;
use crate::recognition::{extract_technologies, SingleFlightRecognizer};
use crate::store::{excerpt, CaptureLogEntry, CaptureStore, LogKind, ScreenCapture};

/// Screen sampling configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Interval between frame samples
    pub sample_interval: Duration,
    /// Delay before the first sample, letting the video surface stabilize
    pub startup_delay: Duration,
    /// Byte-length delta above which a frame counts as a significant
    /// change; a cheap proxy for "enough visual content changed to be
    /// worth re-analyzing"
    pub change_threshold_bytes: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(5000),
            startup_delay: Duration::from_millis(1000),
            change_threshold_bytes: 1000,
        }
    }
}

struct OrchestratorShared {
    config: OrchestratorConfig,
    store: Arc<CaptureStore>,
    recognizer: Arc<SingleFlightRecognizer>,
    vision: Arc<dyn VisionAnalysisClient>,
    events: Arc<dyn PipelineEvents>,
    next_capture_id: AtomicU64,
    frames_sampled: AtomicUsize,
    significant_changes: AtomicUsize,
}

impl OrchestratorShared {
    fn handle_frame(self: &Arc<Self>, frame: Vec<u8>, last_len: &mut Option<usize>) {
        let frame_len = frame.len();
        let id = self.next_capture_id.fetch_add(1, Ordering::SeqCst);
        self.frames_sampled.fetch_add(1, Ordering::SeqCst);

        self.events.on_frame(&frame);
        self.store
            .push_screen_capture(ScreenCapture::new(id, Utc::now(), frame.clone()));
        self.store.push_log(CaptureLogEntry::new(
            LogKind::Screenshot,
            format!("Screen sampled ({} bytes)", frame_len),
        ));

        if let Some(prev_len) = *last_len {
            if frame_len.abs_diff(prev_len) > self.config.change_threshold_bytes {
                self.significant_changes.fetch_add(1, Ordering::SeqCst);
                debug!(
                    prev = prev_len,
                    current = frame_len,
                    "significant screen change detected"
                );
                self.events.on_significant_change(&frame);
                self.dispatch_recognition(id, frame.clone());
                self.dispatch_analysis(id, frame);
            }
        }

        *last_len = Some(frame_len);
    }

    /// Fire-and-forget local text recognition; sampling never waits on it
    fn dispatch_recognition(self: &Arc<Self>, capture_id: u64, image: Vec<u8>) {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            match shared.recognizer.extract(&image).await {
                Ok(Some(result)) => {
                    let text = result.text.trim();
                    if text.is_empty() {
                        return;
                    }
                    shared.store.set_capture_recognized_text(capture_id, text);
                    for tech in extract_technologies(text) {
                        shared.store.add_technology(&tech);
                    }
                    shared.store.push_log(
                        CaptureLogEntry::new(
                            LogKind::Recognition,
                            format!(
                                "Recognized {} words ({:.0}% confidence)",
                                text.split_whitespace().count(),
                                result.confidence
                            ),
                        )
                        .with_preview(excerpt(text, 500)),
                    );
                }
                Ok(None) => debug!("recognition busy, request dropped"),
                Err(e) => warn!("text recognition failed: {e:#}"),
            }
        });
    }

    /// Fire-and-forget remote vision analysis
    fn dispatch_analysis(self: &Arc<Self>, capture_id: u64, image: Vec<u8>) {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            match shared.vision.analyze(&image, SCREEN_ANALYZER_PROMPT).await {
                Ok(analysis) => {
                    shared.store.set_capture_analysis(capture_id, &analysis);
                    for tech in extract_technologies(&analysis) {
                        shared.store.add_technology(&tech);
                    }
                    shared.store.push_log(
                        CaptureLogEntry::new(LogKind::Analysis, "Vision analyzed screen content")
                            .with_preview(excerpt(&analysis, 500)),
                    );
                }
                Err(e) => warn!("vision analysis failed: {e:#}"),
            }
        });
    }
}

/// Periodic screen sampler with change-driven analysis dispatch
///
/// Sampling runs on its own task; recognition and vision jobs are
/// spawned without awaiting, so a slow analysis from frame N may land
/// after frame N+2 has been sampled. `stop()` halts scheduling of new
/// samples and drops the source; in-flight jobs run to completion and
/// write to the store under its late-write policy.
pub struct CaptureOrchestrator {
    shared: Arc<OrchestratorShared>,
    is_active: Arc<AtomicBool>,
    active: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl CaptureOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        store: Arc<CaptureStore>,
        recognizer: Arc<SingleFlightRecognizer>,
        vision: Arc<dyn VisionAnalysisClient>,
        events: Arc<dyn PipelineEvents>,
    ) -> Self {
        let (active, _) = watch::channel(false);
        Self {
            shared: Arc::new(OrchestratorShared {
                config,
                store,
                recognizer,
                vision,
                events,
                next_capture_id: AtomicU64::new(0),
                frames_sampled: AtomicUsize::new(0),
                significant_changes: AtomicUsize::new(0),
            }),
            is_active: Arc::new(AtomicBool::new(false)),
            active,
            task: Mutex::new(None),
        }
    }

    /// Start the sampling loop over the given screen source
    pub async fn start(&self, source: Box<dyn ScreenSource>) -> Result<()> {
        if self.is_active.swap(true, Ordering::SeqCst) {
            warn!("capture orchestrator already active");
            return Ok(());
        }

        info!(
            interval_ms = self.shared.config.sample_interval.as_millis() as u64,
            "capture orchestrator started"
        );
        self.active.send_replace(true);

        let shared = Arc::clone(&self.shared);
        let is_active = Arc::clone(&self.is_active);
        let active_rx = self.active.subscribe();
        let task = tokio::spawn(run_sample_loop(shared, is_active, active_rx, source));

        *self.task.lock().await = Some(task);
        Ok(())
    }

    /// Stop sampling and release the display stream
    pub async fn stop(&self) {
        self.active.send_replace(false);

        if let Some(task) = self.task.lock().await.take() {
            if let Err(e) = task.await {
                warn!("orchestrator task panicked: {e}");
            }
        }

        self.is_active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }

    pub fn frames_sampled(&self) -> usize {
        self.shared.frames_sampled.load(Ordering::SeqCst)
    }

    pub fn significant_changes(&self) -> usize {
        self.shared.significant_changes.load(Ordering::SeqCst)
    }
}

async fn run_sample_loop(
    shared: Arc<OrchestratorShared>,
    is_active: Arc<AtomicBool>,
    mut active: watch::Receiver<bool>,
    mut source: Box<dyn ScreenSource>,
) {
    tokio::time::sleep(shared.config.startup_delay).await;

    let mut ticker = tokio::time::interval(shared.config.sample_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_len: Option<usize> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !*active.borrow() {
                    break;
                }
                match source.next_frame().await {
                    Ok(Some(frame)) => shared.handle_frame(frame, &mut last_len),
                    Ok(None) => debug!("capture surface not ready, retrying at next tick"),
                    Err(e) => warn!("frame sampling failed: {e:#}"),
                }
            }
            changed = active.changed() => {
                if changed.is_err() || !*active.borrow() {
                    break;
                }
            }
        }
    }

    // Dropping the source releases the display stream
    drop(source);
    is_active.store(false, Ordering::SeqCst);
    info!("capture orchestrator stopped");
}
