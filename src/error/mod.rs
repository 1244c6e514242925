//! Error handling for the ingestion worker.
//!
//! | Category | Example | Handling |
//! |----------|---------|----------|
//! | Configuration | `types=digg,bogus` | Fatal, returned before any connection |
//! | Transport | connection reset, 503, idle timeout | Logged, backoff, reconnect forever |
//! | MalformedRecord | `not-json`, missing `type` | Logged as a warning, record dropped |
//! | Sink | Redis unreachable at startup | Fatal at startup, logged per record afterwards |
//!
//! Transport errors are represented by [`crate::traits::HttpError`] and never
//! leave the supervisor.

mod category;
mod ingest_error;
mod record;

pub use category::ErrorCategory;
pub use ingest_error::{IngestError, IngestResult};
pub use record::MalformedRecord;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_startup_errors_are_configuration_or_sink() {
        let startup: Vec<IngestError> = vec![
            IngestError::InvalidEventType("bogus".to_string()),
            IngestError::Config("empty url".to_string()),
            IngestError::Sink("refused".to_string()),
        ];
        for err in startup {
            assert!(
                matches!(
                    err.category(),
                    ErrorCategory::Configuration | ErrorCategory::Sink
                ),
                "Unexpected category for {:?}",
                err
            );
        }

        let malformed = MalformedRecord::MissingType;
        assert_eq!(malformed.category(), ErrorCategory::MalformedRecord);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let err: MalformedRecord = json_err.into();
        assert!(matches!(err, MalformedRecord::InvalidJson(_)));
    }
}
