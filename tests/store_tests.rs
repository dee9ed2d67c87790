// Tests for the shared capture state store
//
// These verify the bounded windows, transcript accumulation, idempotent
// technology tracking, and the late-write policy applied after close.

use chrono::Utc;
use viva_capture::store::{
    CaptureLogEntry, CaptureStore, LateWritePolicy, LogKind, ScreenCapture, MAX_CAPTURE_LOGS,
    MAX_SCREEN_CAPTURES,
};

fn capture(id: u64) -> ScreenCapture {
    ScreenCapture::new(id, Utc::now(), vec![0u8; 16])
}

fn log(summary: &str) -> CaptureLogEntry {
    CaptureLogEntry::new(LogKind::Screenshot, summary)
}

#[test]
fn test_screen_capture_window_under_capacity() {
    let store = CaptureStore::default();

    for i in 0..5 {
        store.push_screen_capture(capture(i));
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.screen_captures.len(), 5);
}

#[test]
fn test_screen_capture_window_keeps_most_recent() {
    let store = CaptureStore::default();

    for i in 0..35 {
        store.push_screen_capture(capture(i));
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.screen_captures.len(), MAX_SCREEN_CAPTURES);
    // Oldest 5 evicted, ids 5..35 retained in insertion order
    assert_eq!(snapshot.screen_captures[0].id, 5);
    assert_eq!(snapshot.screen_captures.last().unwrap().id, 34);
}

#[test]
fn test_log_window_keeps_most_recent() {
    let store = CaptureStore::default();

    for i in 0..60 {
        store.push_log(log(&format!("entry {}", i)));
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.capture_logs.len(), MAX_CAPTURE_LOGS);
    assert_eq!(snapshot.capture_logs[0].summary, "entry 10");
    assert_eq!(snapshot.capture_logs.last().unwrap().summary, "entry 59");
}

#[test]
fn test_add_technology_is_idempotent() {
    let store = CaptureStore::default();

    store.add_technology("Rust");
    store.add_technology("Rust");
    store.add_technology("Docker");

    let snapshot = store.snapshot();
    assert_eq!(snapshot.technologies.len(), 2);
    assert_eq!(snapshot.technologies, vec!["Rust", "Docker"]);
}

#[test]
fn test_append_transcript_inserts_single_space() {
    let store = CaptureStore::default();

    store.append_transcript("a");
    store.append_transcript("b");

    assert_eq!(store.snapshot().transcript, "a b");
}

#[test]
fn test_append_transcript_no_leading_space_when_empty() {
    let store = CaptureStore::default();

    store.append_transcript("hello");

    assert_eq!(store.snapshot().transcript, "hello");
}

#[test]
fn test_append_blank_transcript_is_noop() {
    let store = CaptureStore::default();

    assert!(!store.append_transcript("   "));
    assert_eq!(store.snapshot().transcript, "");
}

#[test]
fn test_attach_results_to_capture() {
    let store = CaptureStore::default();
    store.push_screen_capture(capture(7));

    store.set_capture_recognized_text(7, "fn main()");
    store.set_capture_analysis(7, "A code editor showing Rust");

    let snapshot = store.snapshot();
    let c = &snapshot.screen_captures[0];
    assert_eq!(c.recognized_text.as_deref(), Some("fn main()"));
    assert_eq!(c.analysis.as_deref(), Some("A code editor showing Rust"));
}

#[test]
fn test_attach_to_evicted_capture_is_silent_noop() {
    let store = CaptureStore::default();

    for i in 0..40 {
        store.push_screen_capture(capture(i));
    }

    // id 0 was evicted long ago; the late result has nowhere to land
    store.set_capture_recognized_text(0, "too late");

    let snapshot = store.snapshot();
    assert!(snapshot
        .screen_captures
        .iter()
        .all(|c| c.recognized_text.is_none()));
}

#[test]
fn test_late_writes_accepted_by_default() {
    let store = CaptureStore::new(LateWritePolicy::Accept);

    store.close();
    assert!(store.append_transcript("arrived late"));

    assert_eq!(store.snapshot().transcript, "arrived late");
}

#[test]
fn test_late_writes_dropped_after_close() {
    let store = CaptureStore::new(LateWritePolicy::Drop);

    store.append_transcript("before close");
    store.close();
    assert!(!store.append_transcript("after close"));
    assert!(!store.push_screen_capture(capture(1)));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.transcript, "before close");
    assert!(snapshot.screen_captures.is_empty());
}

#[test]
fn test_reset_clears_state_and_reopens() {
    let store = CaptureStore::new(LateWritePolicy::Drop);

    store.append_transcript("something");
    store.add_technology("Rust");
    store.close();

    store.reset();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.transcript, "");
    assert!(snapshot.technologies.is_empty());
    assert!(!store.is_closed());
    assert!(store.append_transcript("fresh session"));
}

#[test]
fn test_snapshot_is_isolated_from_later_writes() {
    let store = CaptureStore::default();
    store.append_transcript("first");

    let snapshot = store.snapshot();
    store.append_transcript("second");

    assert_eq!(snapshot.transcript, "first");
    assert_eq!(store.snapshot().transcript, "first second");
}
