//! Mock HTTP client for testing.
//!
//! Replays a script of connection outcomes, one per `get_stream` call, so
//! tests can drive the supervisor through failures and reconnects without
//! network access.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use super::clock::MockClock;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
}

/// Scripted outcome of one connection attempt.
#[derive(Debug, Clone)]
pub enum MockConnection {
    /// The request fails before any body is received
    Refused(HttpError),
    /// The body yields these chunks, then ends cleanly
    Stream(Vec<Bytes>),
    /// The body yields these chunks, then fails mid-stream
    StreamThenError(Vec<Bytes>, HttpError),
    /// The body never yields anything
    Hang,
    /// Advance the linked clock, then behave like the inner connection
    Elapsed(Duration, Box<MockConnection>),
}

impl MockConnection {
    /// A body made of text chunks that ends cleanly.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockConnection::Stream(to_bytes(chunks))
    }

    /// A body made of text chunks followed by a read error.
    pub fn chunks_then_error<I, S>(chunks: I, error: HttpError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockConnection::StreamThenError(to_bytes(chunks), error)
    }

    /// Run `self` after `elapsed` of simulated time has passed.
    pub fn after(self, elapsed: Duration) -> Self {
        MockConnection::Elapsed(elapsed, Box::new(self))
    }
}

fn to_bytes<I, S>(chunks: I) -> Vec<Bytes>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    chunks.into_iter().map(|c| Bytes::from(c.into())).collect()
}

/// Mock HTTP client for testing.
///
/// Once the script is used up, every further connection hangs forever and
/// [`wait_exhausted`](Self::wait_exhausted) resolves.
///
/// # Example
///
/// ```ignore
/// use digg_stream::adapters::mock::{MockConnection, MockHttpClient};
/// use digg_stream::traits::HttpError;
///
/// let client = MockHttpClient::new();
/// client.push_connection(MockConnection::Refused(HttpError::Timeout("connect".into())));
/// client.push_connection(MockConnection::chunks([r#"{"type":"digg"}"#]));
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    script: Arc<Mutex<VecDeque<MockConnection>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    clock: Option<MockClock>,
    exhausted: Arc<watch::Sender<bool>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client with an empty script.
    pub fn new() -> Self {
        let (exhausted, _rx) = watch::channel(false);
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            clock: None,
            exhausted: Arc::new(exhausted),
        }
    }

    /// Link a clock advanced by [`MockConnection::Elapsed`].
    pub fn with_clock(mut self, clock: MockClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Append a connection outcome to the script.
    pub fn push_connection(&self, connection: MockConnection) {
        self.script.lock().unwrap().push_back(connection);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Scripted connections not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    /// Resolve once a connection was attempted after the script ran out.
    pub async fn wait_exhausted(&self) {
        let mut rx = self.exhausted.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    fn resolve(&self, connection: MockConnection) -> Result<ByteStream, HttpError> {
        match connection {
            MockConnection::Refused(err) => Err(err),
            MockConnection::Stream(chunks) => {
                Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok))))
            }
            MockConnection::StreamThenError(chunks, err) => {
                let items = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(err)));
                Ok(Box::pin(stream::iter(items)))
            }
            MockConnection::Hang => Ok(Box::pin(stream::pending::<Result<Bytes, HttpError>>())),
            MockConnection::Elapsed(elapsed, inner) => {
                if let Some(clock) = &self.clock {
                    clock.advance(elapsed);
                }
                self.resolve(*inner)
            }
        }
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
        });

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(connection) => self.resolve(connection),
            None => {
                self.exhausted.send_replace(true);
                Ok(Box::pin(stream::pending::<Result<Bytes, HttpError>>()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_script_is_replayed_in_order() {
        let client = MockHttpClient::new();
        client.push_connection(MockConnection::Refused(HttpError::ConnectionFailed(
            "refused".to_string(),
        )));
        client.push_connection(MockConnection::chunks(["a", "b"]));

        let first = client.get_stream("http://test/1", &Headers::new()).await;
        assert!(matches!(first, Err(HttpError::ConnectionFailed(_))));

        let mut body = client
            .get_stream("http://test/2", &Headers::new())
            .await
            .unwrap();
        let mut chunks = Vec::new();
        while let Some(chunk) = body.next().await {
            chunks.push(chunk.unwrap());
        }
        assert_eq!(chunks, vec![Bytes::from("a"), Bytes::from("b")]);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].url, "http://test/2");
        assert_eq!(client.remaining(), 0);
    }

    #[tokio::test]
    async fn test_stream_then_error() {
        let client = MockHttpClient::new();
        client.push_connection(MockConnection::chunks_then_error(
            ["x"],
            HttpError::Io("reset".to_string()),
        ));

        let mut body = client
            .get_stream("http://test", &Headers::new())
            .await
            .unwrap();
        assert_eq!(body.next().await, Some(Ok(Bytes::from("x"))));
        assert_eq!(body.next().await, Some(Err(HttpError::Io("reset".to_string()))));
        assert_eq!(body.next().await, None);
    }

    #[tokio::test]
    async fn test_elapsed_advances_linked_clock() {
        let clock = MockClock::new();
        let start = crate::traits::Clock::now(&clock);
        let client = MockHttpClient::new().with_clock(clock.clone());
        client.push_connection(
            MockConnection::Refused(HttpError::Timeout("t".to_string()))
                .after(Duration::from_secs(3601)),
        );

        let _ = client.get_stream("http://test", &Headers::new()).await;
        assert_eq!(
            crate::traits::Clock::now(&clock) - start,
            Duration::from_secs(3601)
        );
    }

    #[tokio::test]
    async fn test_wait_exhausted_after_script_runs_out() {
        let client = MockHttpClient::new();
        let _body = client.get_stream("http://test", &Headers::new()).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), client.wait_exhausted())
            .await
            .expect("exhaustion was not signalled");
    }
}
