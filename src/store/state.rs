use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of screen captures retained in the store
pub const MAX_SCREEN_CAPTURES: usize = 30;

/// Maximum number of capture log entries retained in the store
pub const MAX_CAPTURE_LOGS: usize = 50;

/// Kind of a capture log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Screenshot,
    Recognition,
    Speech,
    Resume,
    Analysis,
}

/// A single sampled screen frame
///
/// `recognized_text` and `analysis` start out empty and are filled in
/// later by the recognition and vision jobs, if and when they resolve.
#[derive(Debug, Clone)]
pub struct ScreenCapture {
    /// Monotonic capture id assigned by the orchestrator
    pub id: u64,

    /// When the frame was sampled
    pub captured_at: DateTime<Utc>,

    /// Encoded frame bytes
    pub image: Vec<u8>,

    /// Remote vision analysis result (populated asynchronously)
    pub analysis: Option<String>,

    /// Locally recognized text (populated asynchronously)
    pub recognized_text: Option<String>,
}

impl ScreenCapture {
    pub fn new(id: u64, captured_at: DateTime<Utc>, image: Vec<u8>) -> Self {
        Self {
            id,
            captured_at,
            image,
            analysis: None,
            recognized_text: None,
        }
    }
}

/// An append-only capture event, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureLogEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: LogKind,
    pub summary: String,
    pub preview: Option<String>,
}

impl CaptureLogEntry {
    pub fn new(kind: LogKind, summary: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            summary: summary.into(),
            preview: None,
        }
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = Some(preview.into());
        self
    }
}

/// Immutable snapshot of everything captured so far in a session
///
/// Every transition method returns a new state; readers holding a
/// snapshot never observe a partially applied operation.
#[derive(Debug, Clone, Default)]
pub struct CaptureState {
    pub screen_captures: Vec<ScreenCapture>,
    pub capture_logs: Vec<CaptureLogEntry>,
    pub transcript: String,
    pub technologies: Vec<String>,
}

impl CaptureState {
    /// Append a screen capture, keeping the most recent window
    pub fn with_screen_capture(&self, capture: ScreenCapture) -> Self {
        let mut next = self.clone();
        next.screen_captures.push(capture);
        trim_to_window(&mut next.screen_captures, MAX_SCREEN_CAPTURES);
        next
    }

    /// Append a log entry, keeping the most recent window
    pub fn with_log(&self, entry: CaptureLogEntry) -> Self {
        let mut next = self.clone();
        next.capture_logs.push(entry);
        trim_to_window(&mut next.capture_logs, MAX_CAPTURE_LOGS);
        next
    }

    /// Concatenate transcript text with a single separating space
    pub fn with_transcript(&self, text: &str) -> Self {
        let mut next = self.clone();
        if next.transcript.is_empty() {
            next.transcript = text.to_string();
        } else {
            next.transcript.push(' ');
            next.transcript.push_str(text);
        }
        next
    }

    /// Insert a technology name if absent (idempotent)
    pub fn with_technology(&self, name: &str) -> Self {
        if self.technologies.iter().any(|t| t == name) {
            return self.clone();
        }
        let mut next = self.clone();
        next.technologies.push(name.to_string());
        next
    }

    /// Attach recognized text to a capture; no-op if it was evicted
    pub fn with_recognized_text(&self, capture_id: u64, text: &str) -> Self {
        let mut next = self.clone();
        if let Some(capture) = next.screen_captures.iter_mut().find(|c| c.id == capture_id) {
            capture.recognized_text = Some(text.to_string());
        }
        next
    }

    /// Attach a vision analysis to a capture; no-op if it was evicted
    pub fn with_analysis(&self, capture_id: u64, text: &str) -> Self {
        let mut next = self.clone();
        if let Some(capture) = next.screen_captures.iter_mut().find(|c| c.id == capture_id) {
            capture.analysis = Some(text.to_string());
        }
        next
    }

    pub fn transcript_word_count(&self) -> usize {
        self.transcript.split_whitespace().count()
    }
}

/// Char-safe prefix used for log summaries and previews
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut prefix: String = text.chars().take(max_chars).collect();
        prefix.push_str("...");
        prefix
    }
}

fn trim_to_window<T>(items: &mut Vec<T>, window: usize) {
    if items.len() > window {
        let excess = items.len() - window;
        items.drain(..excess);
    }
}
