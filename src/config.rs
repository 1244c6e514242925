//! Worker configuration.
//!
//! [`StreamConfig`] describes the streaming connection and framing, and
//! [`RedisConfig`] the reference sink.
//!
//! # Example
//!
//! ```
//! use digg_stream::config::StreamConfig;
//! use digg_stream::framer::FramingMode;
//!
//! let config = StreamConfig::default()
//!     .with_event_types(["digg", "comment"])
//!     .with_framing(FramingMode::Balanced);
//! assert_eq!(config.event_types, vec!["digg", "comment"]);
//! ```

use std::time::Duration;

use crate::error::{IngestError, IngestResult};
use crate::events::EventType;
use crate::framer::FramingMode;
use crate::supervisor::BackoffPolicy;

/// Default streaming host.
pub const DEFAULT_BASE_URL: &str = "http://services.digg.com";

/// Path of the streaming endpoint.
pub const STREAM_PATH: &str = "/2.0/stream";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "DIGG_STREAM_URL";

/// Configuration for the streaming connection.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Scheme and host of the streaming service (default: http://services.digg.com)
    pub base_url: String,
    /// Requested event type names, validated when the supervisor starts.
    /// Empty selects every legal type.
    pub event_types: Vec<String>,
    /// Record boundary strategy (default: whole buffer)
    pub framing: FramingMode,
    /// Reconnect delays and failure forgiveness
    pub backoff: BackoffPolicy,
    /// Fail the connection when no chunk arrives for this long (default: wait forever)
    pub idle_timeout: Option<Duration>,
    /// Discard the framer buffer beyond this many bytes (default: unbounded)
    pub max_buffer_bytes: Option<usize>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            event_types: Vec::new(),
            framing: FramingMode::default(),
            backoff: BackoffPolicy::default(),
            idle_timeout: None,
            max_buffer_bytes: None,
        }
    }
}

impl StreamConfig {
    /// Create a new StreamConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config honouring the DIGG_STREAM_URL environment variable.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(url),
            _ => Self::default(),
        }
    }

    /// Set the streaming service base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the requested event type names.
    pub fn with_event_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the framing strategy.
    pub fn with_framing(mut self, framing: FramingMode) -> Self {
        self.framing = framing;
        self
    }

    /// Set the backoff policy.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the idle timeout; `None` waits forever for the next chunk.
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Bound the framer buffer.
    pub fn with_max_buffer_bytes(mut self, bytes: Option<usize>) -> Self {
        self.max_buffer_bytes = bytes;
        self
    }

    /// Validate the configuration, returning the resolved event types.
    ///
    /// Performs no I/O.
    pub fn validate(&self) -> IngestResult<Vec<EventType>> {
        let types = EventType::parse_list(&self.event_types)?;

        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(IngestError::Config(format!(
                "base url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.max_buffer_bytes == Some(0) {
            return Err(IngestError::Config(
                "max buffer size must be greater than zero".to_string(),
            ));
        }

        Ok(types)
    }

    /// Full streaming URL for the given event types.
    pub fn stream_url(&self, types: &[EventType]) -> String {
        format!(
            "{}{}?format=json&types={}",
            self.base_url.trim().trim_end_matches('/'),
            STREAM_PATH,
            EventType::join(types)
        )
    }
}

/// Connection parameters for the Redis sink.
#[derive(Debug, Clone, PartialEq)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    /// Logical database index
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
        }
    }
}

impl RedisConfig {
    /// Connection URL in the form `redis://host:port/db`.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}
