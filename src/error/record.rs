//! Malformed-record errors, contained by event handlers.

use thiserror::Error;

use super::category::ErrorCategory;

/// Why a framed record could not be routed to the sink.
#[derive(Debug, Error)]
pub enum MalformedRecord {
    /// The text is not valid JSON.
    #[error("record is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON value is not an object.
    #[error("record is not a JSON object")]
    NotAnObject,

    /// The object has no `type` field.
    #[error("record has no `type` field")]
    MissingType,

    /// The `type` field is present but is not a string.
    #[error("record `type` field is not a string")]
    NonStringType,
}

impl MalformedRecord {
    /// Always [`ErrorCategory::MalformedRecord`].
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::MalformedRecord
    }
}
