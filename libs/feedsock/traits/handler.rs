use crate::traits::error::Result;
use async_trait::async_trait;

/// Trait for consuming inbound WebSocket text frames
///
/// The client calls `on_frame` inline from its receive loop, one frame at a
/// time, so updates derived from frames are applied in arrival order.
///
/// A returned error is logged by the client and discarded; it never affects
/// connection state. Data-quality problems (unrecognized or malformed
/// frames) must be contained here, not escalated.
#[async_trait]
pub trait FrameHandler: Send + Sync {
    /// Handle one inbound text frame
    async fn on_frame(&self, text: &str) -> Result<()>;
}

/// A no-op handler that discards every frame
/// Useful for tests that only exercise the connection lifecycle
pub struct NoOpHandler;

#[async_trait]
impl FrameHandler for NoOpHandler {
    async fn on_frame(&self, _text: &str) -> Result<()> {
        Ok(())
    }
}
