//! Sink trait definitions.

use crate::error::DeliveryError;
use serde_json::Value;

/// A configured output destination.
///
/// Opening a sink acquires its resource (file handle, producer, ...) and
/// returns a [`SinkHandle`] that owns it for the length of one run.
#[async_trait::async_trait]
pub trait OutputSink: Send + Sync {
    /// Registry name of this sink (`console`, `file`, `kafka`, ...).
    fn name(&self) -> &str;

    /// Acquire the sink resource.
    async fn open(&self) -> Result<Box<dyn SinkHandle>, DeliveryError>;
}

/// An open sink.
///
/// `close` consumes the handle, so the resource is released exactly once.
/// Handles dropped without `close` (for example on panic) release their
/// resource through `Drop` of the underlying types, without a final flush
/// guarantee.
#[async_trait::async_trait]
pub trait SinkHandle: Send {
    /// Deliver one record.
    async fn deliver(&mut self, record: &Value) -> Result<(), DeliveryError>;

    /// Flush pending output and release the resource.
    async fn close(self: Box<Self>) -> Result<(), DeliveryError>;
}
