//! Common test utilities for integration tests.
//!
//! Builds supervisors wired to mock adapters and runs them until the scripted
//! connections are used up.

use digg_stream::adapters::mock::{MemoryEventHandler, MockClock, MockConnection, MockHttpClient};
use digg_stream::config::StreamConfig;
use digg_stream::error::IngestResult;
use digg_stream::supervisor::StreamSupervisor;
use digg_stream::traits::HttpError;

pub type MockSupervisor = StreamSupervisor<MockHttpClient, MemoryEventHandler, MockClock>;

/// Mock adapters shared between a supervisor and the test body.
pub struct Harness {
    pub client: MockHttpClient,
    pub handler: MemoryEventHandler,
    pub clock: MockClock,
}

impl Harness {
    pub fn new() -> Self {
        let clock = MockClock::new();
        Self {
            client: MockHttpClient::new().with_clock(clock.clone()),
            handler: MemoryEventHandler::new(),
            clock,
        }
    }

    /// A supervisor over these mocks, with the idle timeout disabled.
    pub fn supervisor(&self, config: StreamConfig) -> MockSupervisor {
        StreamSupervisor::new(
            config.with_idle_timeout(None),
            self.client.clone(),
            self.handler.clone(),
            self.clock.clone(),
        )
    }

    /// Run until every scripted connection has been consumed, then shut down.
    pub async fn run_script(&self, supervisor: &mut MockSupervisor) -> IngestResult<()> {
        let shutdown = supervisor.shutdown_handle();
        let client = self.client.clone();
        let (result, ()) = tokio::join!(supervisor.run(), async move {
            client.wait_exhausted().await;
            shutdown.trigger();
        });
        result
    }
}

/// A connection attempt refused at the TCP level.
pub fn refused() -> MockConnection {
    MockConnection::Refused(HttpError::ConnectionFailed("connection refused".to_string()))
}
