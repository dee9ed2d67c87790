use anyhow::Result;

/// Shared-screen frame source
///
/// Platform display streams are opaque behind this trait; the embedder
/// supplies one per session, tests use scripted stubs. Dropping the
/// source releases the underlying display stream.
#[async_trait::async_trait]
pub trait ScreenSource: Send {
    /// Grab one encoded frame
    ///
    /// Returns `Ok(None)` while the capture surface reports zero
    /// dimensions (not yet ready); the sample is skipped and retried
    /// at the next tick.
    async fn next_frame(&mut self) -> Result<Option<Vec<u8>>>;
}
