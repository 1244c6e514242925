//! Connection supervisor: owns the streaming connection lifecycle.
//!
//! ```text
//! Idle -> Connecting -> Streaming -> Failed -> Backoff -> Connecting -> ...
//! ```
//!
//! Every received chunk goes through a [`StreamFramer`]; each completed record
//! is handed to the [`EventHandler`] before the next chunk is read. Transport
//! failures are logged and retried forever under the [`BackoffPolicy`]. The
//! only error returned to the caller is invalid configuration, detected
//! before any connection is attempted.

mod backoff;
mod state;

pub use backoff::{BackoffPolicy, FailureTracker, HUGE_BACKOFF_AFTER};
pub use state::{ShutdownHandle, SupervisorState};

use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::StreamConfig;
use crate::error::IngestResult;
use crate::events::EventType;
use crate::framer::StreamFramer;
use crate::traits::{ByteStream, Clock, EventHandler, Headers, HttpClient, HttpError};
use state::wait_for_shutdown;

/// How a single streaming session ended without a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// The server closed the response body.
    Closed,
    /// Shutdown was requested.
    Shutdown,
}

/// Counters for one connection, logged when it ends.
#[derive(Debug, Default)]
struct SessionStats {
    chunks: u64,
    bytes: u64,
    records: u64,
}

/// Drives connect / stream / backoff / reconnect until shut down.
///
/// # Example
///
/// ```ignore
/// use digg_stream::adapters::{ReqwestHttpClient, TokioClock};
/// use digg_stream::config::StreamConfig;
/// use digg_stream::supervisor::StreamSupervisor;
///
/// let mut supervisor = StreamSupervisor::new(
///     StreamConfig::from_env().with_event_types(["digg"]),
///     ReqwestHttpClient::new(),
///     handler,
///     TokioClock,
/// );
/// supervisor.run().await?;
/// ```
pub struct StreamSupervisor<C, H, K> {
    config: StreamConfig,
    client: C,
    handler: H,
    clock: K,
    state_tx: watch::Sender<SupervisorState>,
    shutdown: ShutdownHandle,
    shutdown_rx: watch::Receiver<bool>,
}

impl<C, H, K> StreamSupervisor<C, H, K>
where
    C: HttpClient,
    H: EventHandler,
    K: Clock,
{
    /// Create a supervisor. Nothing is validated or connected until [`run`](Self::run).
    pub fn new(config: StreamConfig, client: C, handler: H, clock: K) -> Self {
        let (state_tx, _state_rx) = watch::channel(SupervisorState::Idle);
        let shutdown = ShutdownHandle::new();
        let shutdown_rx = shutdown.subscribe();
        Self {
            config,
            client,
            handler,
            clock,
            state_tx,
            shutdown,
            shutdown_rx,
        }
    }

    /// The configuration this supervisor runs with.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// The event handler records are delivered to.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Handle for requesting a cooperative stop.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Subscribe to lifecycle state changes.
    pub fn state_receiver(&self) -> watch::Receiver<SupervisorState> {
        self.state_tx.subscribe()
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SupervisorState {
        self.state_tx.borrow().clone()
    }

    /// Validate the configuration, then stream until shut down.
    ///
    /// Returns an error only for invalid configuration, before any connection
    /// is attempted. Transport failures are retried forever. Returns `Ok(())`
    /// once the [`ShutdownHandle`] is triggered.
    pub async fn run(&mut self) -> IngestResult<()> {
        let types = match self.config.validate() {
            Ok(types) => types,
            Err(e) => {
                error!(
                    "Refusing to start stream ingestion ({} error): {}",
                    e.category(),
                    e
                );
                return Err(e);
            }
        };
        let url = self.config.stream_url(&types);
        let headers = stream_headers();

        info!(
            "Starting stream ingestion for types={} from {}",
            EventType::join(&types),
            url
        );

        let mut failures = FailureTracker::new(self.config.backoff.clone(), self.clock.now());
        let mut attempt: u64 = 0;

        loop {
            if self.shutdown.is_triggered() {
                break;
            }

            attempt += 1;
            self.set_state(SupervisorState::Connecting { attempt });

            match self.stream_once(&url, &headers).await {
                Ok(SessionEnd::Shutdown) => break,
                Ok(SessionEnd::Closed) => {
                    info!("Stream closed by server, reconnecting");
                }
                Err(e) => {
                    error!("Stream connection failed (attempt {}): {}", attempt, e);
                    self.set_state(SupervisorState::Failed);

                    let delay = failures.record_failure(self.clock.now());
                    self.set_state(SupervisorState::Backoff {
                        failures: failures.failure_count(),
                        delay,
                    });

                    if !delay.is_zero() {
                        info!(
                            "Backing off for {}s after {} consecutive failures",
                            delay.as_secs(),
                            failures.failure_count()
                        );
                        if self.sleep_or_shutdown(delay).await {
                            break;
                        }
                    }
                }
            }
        }

        self.set_state(SupervisorState::Stopped);
        info!("Stream ingestion stopped after {} connection attempts", attempt);
        Ok(())
    }

    /// One connection: request, then frame and dispatch chunks until the body
    /// ends, fails, or shutdown is requested.
    async fn stream_once(&mut self, url: &str, headers: &Headers) -> Result<SessionEnd, HttpError> {
        let mut body = tokio::select! {
            biased;
            _ = wait_for_shutdown(&mut self.shutdown_rx) => return Ok(SessionEnd::Shutdown),
            result = self.client.get_stream(url, headers) => result?,
        };

        info!("Connected to stream");
        self.set_state(SupervisorState::Streaming);

        let mut framer = StreamFramer::new(self.config.framing);
        if let Some(limit) = self.config.max_buffer_bytes {
            framer = framer.with_max_buffer(limit);
        }
        let mut stats = SessionStats::default();

        let end = loop {
            let next = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut self.shutdown_rx) => break Ok(SessionEnd::Shutdown),
                next = next_chunk(&mut body, self.config.idle_timeout) => next,
            };

            match next {
                Ok(Some(chunk)) => {
                    stats.chunks += 1;
                    stats.bytes += chunk.len() as u64;

                    let mut record = framer.feed(&chunk).into_record();
                    while let Some(complete) = record {
                        stats.records += 1;
                        debug!("Dispatching record #{} ({} bytes)", stats.records, complete.len());
                        self.handler.handle(&complete).await;
                        record = framer.next_buffered();
                    }
                }
                Ok(None) => break Ok(SessionEnd::Closed),
                Err(e) => break Err(e),
            }
        };

        let discarded = framer.reset();
        if discarded > 0 {
            debug!("Discarding {} bytes of an incomplete record", discarded);
        }
        info!(
            "Disconnected after {} records, {} chunks, {} bytes",
            stats.records, stats.chunks, stats.bytes
        );

        end
    }

    /// Sleep on the injected clock. Returns true if shutdown was requested.
    async fn sleep_or_shutdown(&mut self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = wait_for_shutdown(&mut self.shutdown_rx) => true,
            _ = self.clock.sleep(delay) => self.shutdown.is_triggered(),
        }
    }

    fn set_state(&self, state: SupervisorState) {
        debug!("Supervisor state: {}", state);
        self.state_tx.send_replace(state);
    }
}

/// Read the next body chunk, failing with a timeout if the stream goes idle.
async fn next_chunk(
    body: &mut ByteStream,
    idle_timeout: Option<Duration>,
) -> Result<Option<Bytes>, HttpError> {
    let next = match idle_timeout {
        Some(limit) => tokio::time::timeout(limit, body.next())
            .await
            .map_err(|_| {
                HttpError::Timeout(format!("no data received for {}s", limit.as_secs()))
            })?,
        None => body.next().await,
    };
    next.transpose()
}

fn stream_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert(
        "User-Agent".to_string(),
        format!("digg-stream/{}", env!("CARGO_PKG_VERSION")),
    );
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MemoryEventHandler, MockClock, MockConnection, MockHttpClient};
    use crate::traits::HttpError;

    fn supervisor(
        config: StreamConfig,
        client: MockHttpClient,
    ) -> StreamSupervisor<MockHttpClient, MemoryEventHandler, MockClock> {
        StreamSupervisor::new(
            config.with_idle_timeout(None),
            client,
            MemoryEventHandler::new(),
            MockClock::new(),
        )
    }

    #[test]
    fn test_stream_headers() {
        let headers = stream_headers();
        assert!(headers["User-Agent"].starts_with("digg-stream/"));
        assert_eq!(headers["Accept"], "application/json");
    }

    #[tokio::test]
    async fn test_invalid_type_fails_before_connecting() {
        let client = MockHttpClient::new();
        let mut sup = supervisor(
            StreamConfig::default().with_event_types(["digg", "bogus"]),
            client.clone(),
        );
        assert!(sup.run().await.is_err());
        assert!(client.get_requests().is_empty());
        assert_eq!(sup.state(), SupervisorState::Idle);
    }

    #[tokio::test]
    async fn test_shutdown_before_run_connects_nothing() {
        let client = MockHttpClient::new();
        let mut sup = supervisor(StreamConfig::default(), client.clone());
        sup.shutdown_handle().trigger();
        sup.run().await.unwrap();
        assert!(client.get_requests().is_empty());
        assert_eq!(sup.state(), SupervisorState::Stopped);
    }

    #[tokio::test]
    async fn test_stream_once_reports_server_error() {
        let client = MockHttpClient::new();
        client.push_connection(MockConnection::Refused(HttpError::ServerError {
            status: 503,
            message: "Service Unavailable".to_string(),
        }));
        let mut sup = supervisor(StreamConfig::default(), client);
        let result = sup.stream_once("http://test/2.0/stream", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::ServerError { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_stream_once_dispatches_and_ends_cleanly() {
        let client = MockHttpClient::new();
        client.push_connection(MockConnection::chunks([
            "{\"type\":\"digg\",",
            "\"id\":1}",
            "{\"type\":\"comment\"}",
        ]));
        let mut sup = supervisor(StreamConfig::default(), client);
        let result = sup.stream_once("http://test/2.0/stream", &Headers::new()).await;
        assert_eq!(result, Ok(SessionEnd::Closed));
        assert_eq!(
            sup.handler().list("digg"),
            vec!["{\"type\":\"digg\",\"id\":1}".to_string()]
        );
        assert_eq!(sup.handler().list("comment").len(), 1);
    }
}
