pub mod backend;
pub mod file;
pub mod recorder;
pub mod segment;

pub use backend::{AudioBackend, AudioBackendConfig, AudioFrame};
pub use file::{AudioFile, WavFileBackend};
pub use recorder::{RecorderConfig, SegmentRecorder};
pub use segment::{AudioSegment, SegmentEncoder};
