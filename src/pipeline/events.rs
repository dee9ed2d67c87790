/// Callbacks the pipeline surfaces to the embedding application
///
/// All methods default to no-ops; implementors override what they
/// consume. Callbacks are invoked from pipeline tasks and must be cheap
/// and non-blocking.
pub trait PipelineEvents: Send + Sync {
    /// One frame was sampled, regardless of change detection
    fn on_frame(&self, _image: &[u8]) {}

    /// The change heuristic fired for this frame
    fn on_significant_change(&self, _image: &[u8]) {}

    /// One audio segment completed transcription
    fn on_transcript(&self, _text: &str) {}
}

/// Event sink that ignores everything
pub struct NoopEvents;

impl PipelineEvents for NoopEvents {}
