//! Event handler trait: the downstream sink for framed records.

use async_trait::async_trait;

/// Receives every complete record framed from the stream.
///
/// The supervisor awaits each call before reading the next chunk, so a slow
/// handler stalls consumption of the stream.
///
/// Implementations must not fail for malformed input: a record that is not
/// JSON, or that lacks a string `type` field, is logged as a warning and
/// dropped. Failures writing to the backing store are likewise logged and
/// contained.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use digg_stream::traits::EventHandler;
///
/// struct StdoutHandler;
///
/// #[async_trait]
/// impl EventHandler for StdoutHandler {
///     async fn handle(&self, record: &str) {
///         println!("{}", record.trim());
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one framed record.
    async fn handle(&self, record: &str);
}

#[async_trait]
impl<T: EventHandler + ?Sized> EventHandler for std::sync::Arc<T> {
    async fn handle(&self, record: &str) {
        (**self).handle(record).await
    }
}
