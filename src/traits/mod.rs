//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Streaming HTTP GET
//! - [`EventHandler`] - Downstream sink for framed records
//! - [`Clock`] - Current time and sleeping

pub mod clock;
pub mod handler;
pub mod http;

pub use clock::Clock;
pub use handler::EventHandler;
pub use http::{ByteStream, Headers, HttpClient, HttpError};
