//! Errors that cross the ingestion entry point.

use thiserror::Error;

use super::category::ErrorCategory;

/// Errors surfaced to the caller of the worker.
///
/// Transport failures never appear here: the supervisor contains them and
/// turns them into backoff and reconnects.
#[derive(Debug, Error)]
pub enum IngestError {
    /// An event type outside `{digg, comment, submission}` was requested.
    #[error("{0} is not a legal event type")]
    InvalidEventType(String),

    /// Startup configuration that cannot be used (bad URL, bad bounds).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The event sink could not be opened.
    #[error("sink unavailable: {0}")]
    Sink(String),

    /// Local filesystem failure while opening a file sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            IngestError::InvalidEventType(_) | IngestError::Config(_) => {
                ErrorCategory::Configuration
            }
            IngestError::Sink(_) | IngestError::Io(_) => ErrorCategory::Sink,
        }
    }
}

impl From<redis::RedisError> for IngestError {
    fn from(err: redis::RedisError) -> Self {
        IngestError::Sink(err.to_string())
    }
}

/// Result alias for fallible worker operations.
pub type IngestResult<T> = Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_event_type_display() {
        let err = IngestError::InvalidEventType("bogus".to_string());
        assert_eq!(err.to_string(), "bogus is not a legal event type");
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: IngestError = io_err.into();
        assert!(matches!(err, IngestError::Io(_)));
        assert_eq!(err.category(), ErrorCategory::Sink);
    }

    #[test]
    fn test_config_error_category() {
        let err = IngestError::Config("base url is empty".to_string());
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_redis_error_is_sink() {
        let redis_err = redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"));
        let err: IngestError = redis_err.into();
        assert!(matches!(err, IngestError::Sink(_)));
        assert_eq!(err.category(), ErrorCategory::Sink);
    }
}
