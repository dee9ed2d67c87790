// Tests for the file-backed audio backend

use std::time::Duration;

use viva_capture::audio::{AudioBackend, AudioBackendConfig, AudioFile, WavFileBackend};

fn write_test_wav(path: &std::path::Path, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn test_audio_file_reports_format_and_duration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_test_wav(&path, &vec![500i16; 16000]);

    let audio = AudioFile::open(&path).unwrap();

    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.samples.len(), 16000);
    assert!((audio.duration_seconds - 1.0).abs() < 1e-9);
}

#[test]
fn test_audio_file_open_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(AudioFile::open(dir.path().join("absent.wav")).is_err());
}

#[tokio::test]
async fn test_wav_file_backend_emits_all_samples_in_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.wav");
    write_test_wav(&path, &vec![250i16; 16000]);

    let config = AudioBackendConfig {
        buffer_duration_ms: 250,
        ..AudioBackendConfig::default()
    };
    let mut backend = WavFileBackend::new(path.to_string_lossy(), config);
    assert_eq!(backend.name(), "wav-file");

    let mut frames = backend.start().await.unwrap();

    let mut total_samples = 0;
    let mut frame_count = 0;
    while let Some(frame) = frames.recv().await {
        assert_eq!(frame.sample_rate, 16000);
        assert_eq!(frame.channels, 1);
        assert!((frame.duration_secs() - 0.25).abs() < 1e-9);
        total_samples += frame.samples.len();
        frame_count += 1;
    }

    // One second of audio at 250ms granularity
    assert_eq!(frame_count, 4);
    assert_eq!(total_samples, 16000);

    backend.stop().await.unwrap();
    assert!(!backend.is_capturing());
}

#[tokio::test]
async fn test_wav_file_backend_stop_aborts_emission() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.wav");
    write_test_wav(&path, &vec![0i16; 160_000]);

    let mut backend = WavFileBackend::new(
        path.to_string_lossy(),
        AudioBackendConfig::default(),
    );
    let mut frames = backend.start().await.unwrap();

    // Consume one frame, then release the device mid-stream
    assert!(frames.recv().await.is_some());
    backend.stop().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!backend.is_capturing());
}
