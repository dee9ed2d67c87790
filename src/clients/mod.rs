//! Remote service adapters
//!
//! Thin asynchronous clients for the two remote collaborators: speech
//! transcription and vision analysis. Both are failure-opaque; callers
//! decide whether a failed call is logged and swallowed or escalated.

mod groq;

use anyhow::Result;

use crate::audio::AudioSegment;

pub use groq::{GroqTranscriptionClient, GroqVisionClient, FALLBACK_ANALYSIS};

/// Default prompt sent alongside screen frames for vision analysis
pub const SCREEN_ANALYZER_PROMPT: &str = "\
You are an expert at analyzing technical content from screen captures.
Analyze this screenshot and identify:
1. What type of content is shown (code, slide, diagram, terminal, UI, documentation)
2. Key technologies, frameworks, or tools visible
3. Main concepts or topics being presented
4. Any code snippets worth discussing
5. Potential interview questions based on what you see

Be specific and technical. Focus on actionable insights for generating interview questions.";

/// Speech-to-text service
#[async_trait::async_trait]
pub trait TranscriptionClient: Send + Sync {
    /// Transcribe one audio segment; no partial or streaming results
    async fn transcribe(&self, segment: &AudioSegment) -> Result<String>;
}

/// Remote vision analysis service
#[async_trait::async_trait]
pub trait VisionAnalysisClient: Send + Sync {
    /// Analyze an encoded image under the given prompt
    async fn analyze(&self, image: &[u8], prompt: &str) -> Result<String>;
}
