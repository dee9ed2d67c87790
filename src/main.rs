use anyhow::Result;
use clap::Parser;
use tracing::info;
use viva_capture::{AudioFile, Config};

#[derive(Parser)]
#[command(name = "viva-capture", about = "Presentation capture pipeline")]
struct Cli {
    /// Configuration file (without extension)
    #[arg(long, default_value = "config/viva-capture")]
    config: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("viva-capture v0.1.0");
    info!("Loaded config: {}", cfg.service.name);
    info!(
        "Screen sampling every {}ms (change threshold {} bytes)",
        cfg.capture.sample_interval_ms, cfg.capture.change_threshold_bytes
    );
    info!(
        "Audio segments every {}ms (minimum {} bytes, continuous: {})",
        cfg.audio.segment_duration_ms, cfg.audio.min_segment_bytes, cfg.audio.continuous
    );

    if std::env::var(&cfg.services.api_key_env).is_ok() {
        let transcription = cfg.transcription_client()?;
        let vision = cfg.vision_client()?;
        info!("Transcription endpoint: {}", transcription.endpoint());
        info!("Vision endpoint: {}", vision.endpoint());
    } else {
        info!(
            "{} not set, remote clients not configured",
            cfg.services.api_key_env
        );
    }

    // Probe a fixture audio file if present
    let fixture_path = "tests/fixtures/sample-presentation.wav";
    if std::path::Path::new(fixture_path).exists() {
        let audio = AudioFile::open(fixture_path)?;
        info!("Fixture audio loaded");
        info!("Duration: {:.1} seconds", audio.duration_seconds);
        info!("Sample rate: {} Hz", audio.sample_rate);
        info!("Channels: {}", audio.channels);
    } else {
        info!("No fixture found at {}", fixture_path);
        info!("Embed this crate and supply ScreenSource/AudioBackend implementations to run a live session");
    }

    Ok(())
}
