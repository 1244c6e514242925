//! Error category classification for the ingestion worker.
//!
//! Every failure the worker can observe falls into one of four categories.
//! Transport failures are retried by the supervisor, malformed records are
//! dropped by the handler, and configuration and sink failures stop the
//! worker at startup with the category's recovery hint.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Invalid startup configuration (e.g. an illegal event type).
    /// Fatal and never retried.
    Configuration,

    /// DNS, TCP, TLS, timeout or HTTP failures on the streaming connection.
    /// Drives the backoff state machine and is retried forever.
    Transport,

    /// A framed record that is not JSON or lacks a string `type` field.
    /// Logged and dropped inside the event handler.
    MalformedRecord,

    /// The downstream sink could not be reached or written.
    Sink,
}

impl ErrorCategory {
    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Transport => "transport",
            ErrorCategory::MalformedRecord => "malformed_record",
            ErrorCategory::Sink => "sink",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => {
                "Request only the event types digg, comment or submission"
            }
            ErrorCategory::Transport => "The connection is retried automatically",
            ErrorCategory::MalformedRecord => "The record was dropped; the stream continues",
            ErrorCategory::Sink => "Check that the destination store is reachable",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
