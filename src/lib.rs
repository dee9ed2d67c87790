pub mod audio;
pub mod capture;
pub mod clients;
pub mod config;
pub mod pipeline;
pub mod recognition;
pub mod store;

pub use audio::{
    AudioBackend, AudioBackendConfig, AudioFile, AudioFrame, AudioSegment, RecorderConfig,
    SegmentEncoder, SegmentRecorder, WavFileBackend,
};
pub use capture::{CaptureOrchestrator, OrchestratorConfig, ScreenSource};
pub use clients::{
    GroqTranscriptionClient, GroqVisionClient, TranscriptionClient, VisionAnalysisClient,
};
pub use config::Config;
pub use pipeline::{NoopEvents, PipelineConfig, PipelineEvents, PipelineStats, PresentationPipeline};
pub use recognition::{RecognitionOutcome, RecognitionResult, SingleFlightRecognizer, TextRecognizer};
pub use store::{
    CaptureLogEntry, CaptureState, CaptureStore, LateWritePolicy, LogKind, ScreenCapture,
};
