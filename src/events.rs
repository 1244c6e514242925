//! Event types accepted by the streaming endpoint and routing of framed records.
//!
//! The stream can be filtered to any subset of three event categories. Every
//! record on the wire is a JSON object carrying at least a `type` field naming
//! its category:
//!
//! ```text
//! {"type": "digg", "date": 1273000000, "item": {...}, "user": {...}}
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{IngestError, MalformedRecord};

/// One of the legal stream event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Digg,
    Comment,
    Submission,
}

impl EventType {
    /// All legal event types, in the order used when none are requested.
    pub const ALL: [EventType; 3] = [EventType::Digg, EventType::Comment, EventType::Submission];

    /// Wire name of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Digg => "digg",
            EventType::Comment => "comment",
            EventType::Submission => "submission",
        }
    }

    /// Validate the requested event type names.
    ///
    /// An empty request selects every legal type. The first illegal name is
    /// reported as [`IngestError::InvalidEventType`]. Repeated names are
    /// collapsed, keeping the first occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use digg_stream::events::EventType;
    ///
    /// let types = EventType::parse_list(&["comment", "digg"]).unwrap();
    /// assert_eq!(types, vec![EventType::Comment, EventType::Digg]);
    ///
    /// assert!(EventType::parse_list(&["digg", "bogus"]).is_err());
    /// ```
    pub fn parse_list<S: AsRef<str>>(requested: &[S]) -> Result<Vec<EventType>, IngestError> {
        if requested.is_empty() {
            return Ok(EventType::ALL.to_vec());
        }

        let mut types = Vec::with_capacity(requested.len());
        for name in requested {
            let event_type: EventType = name.as_ref().parse()?;
            if !types.contains(&event_type) {
                types.push(event_type);
            }
        }
        Ok(types)
    }

    /// Comma-join event types for the `types` query parameter.
    pub fn join(types: &[EventType]) -> String {
        types
            .iter()
            .map(EventType::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for EventType {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digg" => Ok(EventType::Digg),
            "comment" => Ok(EventType::Comment),
            "submission" => Ok(EventType::Submission),
            other => Err(IngestError::InvalidEventType(other.to_string())),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A framed record paired with the sink key taken from its `type` field.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedRecord<'a> {
    /// Value of the record's `type` field, used verbatim as the sink key.
    pub event_type: String,
    /// The record exactly as it was framed from the stream.
    pub raw: &'a str,
}

impl<'a> RoutedRecord<'a> {
    /// Parse a framed record and extract its routing key.
    ///
    /// The key is not checked against [`EventType`]: the stream is already
    /// filtered server-side and unknown categories are stored as-is.
    pub fn parse(raw: &'a str) -> Result<Self, MalformedRecord> {
        let value: Value = serde_json::from_str(raw)?;
        let object = value.as_object().ok_or(MalformedRecord::NotAnObject)?;
        let event_type = match object.get("type") {
            Some(Value::String(t)) => t.clone(),
            Some(_) => return Err(MalformedRecord::NonStringType),
            None => return Err(MalformedRecord::MissingType),
        };
        Ok(Self { event_type, raw })
    }
}
