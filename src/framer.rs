//! Stream framer: reconstructs complete JSON records from an arbitrarily
//! chunked byte stream.
//!
//! Chunk boundaries carry no meaning. A record may span many chunks; the
//! framer accumulates bytes until a complete value is available.
//!
//! Two strategies are available:
//!
//! - [`FramingMode::WholeBuffer`] (default): the entire accumulated buffer must
//!   parse as exactly one JSON value. When it does, the buffer is emitted
//!   verbatim and cleared. Two records that arrive back to back in the buffer
//!   never parse as one value, so they stay buffered until the stream
//!   happens to realign, possibly never. This matches the behavior existing
//!   consumers of the stream were built against.
//! - [`FramingMode::Balanced`]: emits the first complete top-level value and
//!   keeps the remainder, so concatenated records are split correctly. Use
//!   [`StreamFramer::next_buffered`] to drain values that are already complete.
//!
//! The buffer is unbounded unless [`StreamFramer::with_max_buffer`] is used: a
//! stream that never yields a parseable value grows it without limit.

use serde::de::IgnoredAny;
use tracing::{debug, warn};

/// Strategy for locating record boundaries in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingMode {
    /// Parse the whole buffer as one value; emit and clear on success.
    #[default]
    WholeBuffer,
    /// Emit the first balanced top-level value, keeping any remainder.
    Balanced,
}

/// Outcome of feeding a chunk to the framer.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A complete record is available.
    Complete(String),
    /// The buffered bytes do not yet form a record.
    Incomplete,
}

impl Frame {
    /// Consume the frame, returning the record if one completed.
    pub fn into_record(self) -> Option<String> {
        match self {
            Frame::Complete(record) => Some(record),
            Frame::Incomplete => None,
        }
    }
}

/// Accumulates stream bytes and extracts complete JSON records.
///
/// Each framer owns its buffer; independent streams use independent framers.
///
/// # Example
///
/// ```
/// use digg_stream::framer::{Frame, StreamFramer};
///
/// let mut framer = StreamFramer::default();
/// assert_eq!(framer.feed(br#"{"type":"di"#), Frame::Incomplete);
/// assert_eq!(
///     framer.feed(br#"gg"}"#),
///     Frame::Complete(r#"{"type":"digg"}"#.to_string())
/// );
/// assert!(framer.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct StreamFramer {
    buffer: Vec<u8>,
    mode: FramingMode,
    max_buffer: Option<usize>,
}

impl StreamFramer {
    /// Create a framer using the given strategy.
    pub fn new(mode: FramingMode) -> Self {
        Self {
            buffer: Vec::new(),
            mode,
            max_buffer: None,
        }
    }

    /// Discard the buffer whenever it grows beyond `bytes`.
    pub fn with_max_buffer(mut self, bytes: usize) -> Self {
        self.max_buffer = Some(bytes);
        self
    }

    /// The framing strategy in use.
    pub fn mode(&self) -> FramingMode {
        self.mode
    }

    /// Number of bytes currently buffered.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// True when no bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop buffered bytes, returning how many were discarded.
    pub fn reset(&mut self) -> usize {
        let discarded = self.buffer.len();
        self.buffer.clear();
        discarded
    }

    /// Append a chunk and try to extract a record.
    ///
    /// Returns at most one record. An incomplete buffer is the normal state
    /// while a record is still arriving and is not an error.
    pub fn feed(&mut self, chunk: &[u8]) -> Frame {
        self.buffer.extend_from_slice(chunk);

        let frame = match self.mode {
            FramingMode::WholeBuffer => self.take_whole_buffer(),
            FramingMode::Balanced => self.take_first_value(),
        };
        if frame == Frame::Incomplete {
            self.discard_if_oversized();
        }
        frame
    }

    /// Extract another record that is already complete in the buffer.
    ///
    /// Always `None` in [`FramingMode::WholeBuffer`], where a successful
    /// [`feed`](Self::feed) leaves the buffer empty.
    pub fn next_buffered(&mut self) -> Option<String> {
        match self.mode {
            FramingMode::WholeBuffer => None,
            FramingMode::Balanced => {
                let record = self.take_first_value().into_record();
                if record.is_none() {
                    self.discard_if_oversized();
                }
                record
            }
        }
    }

    /// Enforce the buffer bound. Only called once no complete record remains.
    fn discard_if_oversized(&mut self) {
        if let Some(limit) = self.max_buffer {
            if self.buffer.len() > limit {
                warn!(
                    "Framer buffer exceeded {} bytes without a complete record, discarding {} bytes",
                    limit,
                    self.buffer.len()
                );
                self.buffer.clear();
            }
        }
    }

    fn take_whole_buffer(&mut self) -> Frame {
        if serde_json::from_slice::<IgnoredAny>(&self.buffer).is_err() {
            return Frame::Incomplete;
        }

        match String::from_utf8(std::mem::take(&mut self.buffer)) {
            Ok(record) => {
                debug!("Framed record of {} bytes", record.len());
                Frame::Complete(record)
            }
            Err(e) => {
                self.buffer = e.into_bytes();
                Frame::Incomplete
            }
        }
    }

    fn take_first_value(&mut self) -> Frame {
        loop {
            if self.buffer.is_empty() {
                return Frame::Incomplete;
            }

            let mut values =
                serde_json::Deserializer::from_slice(&self.buffer).into_iter::<IgnoredAny>();
            match values.next() {
                None => {
                    // Only whitespace buffered.
                    self.buffer.clear();
                    return Frame::Incomplete;
                }
                Some(Ok(_)) => {
                    let end = values.byte_offset();
                    let start = self.buffer[..end]
                        .iter()
                        .position(|b| !b.is_ascii_whitespace())
                        .unwrap_or(end);
                    let record = String::from_utf8_lossy(&self.buffer[start..end]).into_owned();
                    self.buffer.drain(..end);
                    debug!(
                        "Framed record of {} bytes, {} bytes remain buffered",
                        record.len(),
                        self.buffer.len()
                    );
                    return Frame::Complete(record);
                }
                Some(Err(e)) if e.is_eof() => return Frame::Incomplete,
                Some(Err(e)) => {
                    let discard = self
                        .buffer
                        .iter()
                        .position(|&b| b == b'\n')
                        .map_or(self.buffer.len(), |pos| pos + 1);
                    warn!(
                        "Discarding {} bytes of unparseable stream data: {}",
                        discard, e
                    );
                    self.buffer.drain(..discard);
                }
            }
        }
    }
}
