//! HTTP client trait abstraction.
//!
//! Provides a trait-based abstraction over the streaming GET used by the
//! supervisor, enabling dependency injection and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A response body delivered incrementally, chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP client errors.
///
/// Every variant is a transport failure from the supervisor's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed (DNS, TCP, TLS)
    ConnectionFailed(String),
    /// Request or read timeout
    Timeout(String),
    /// Server returned a non-2xx status
    ServerError { status: u16, message: String },
    /// Body read failed mid-stream
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for streaming HTTP operations.
///
/// # Example
///
/// ```ignore
/// use digg_stream::traits::{Headers, HttpClient, HttpError};
/// use futures::StreamExt;
///
/// async fn first_chunk<C: HttpClient>(client: &C) -> Result<usize, HttpError> {
///     let mut body = client.get_stream("http://services.digg.com/2.0/stream", &Headers::new()).await?;
///     let chunk = body.next().await.transpose()?.unwrap_or_default();
///     Ok(chunk.len())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request and return the response body as a stream.
    ///
    /// Non-2xx responses are reported as [`HttpError::ServerError`] before
    /// any body chunk is yielded.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `headers` - Request headers
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError>;
}
