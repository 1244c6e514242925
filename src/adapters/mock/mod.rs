//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - Scripted connection outcomes
//! - [`MockClock`] - Simulated time that records sleeps
//! - [`MemoryEventHandler`] - In-memory per-type lists

pub mod clock;
pub mod handler;
pub mod http;

pub use clock::MockClock;
pub use handler::MemoryEventHandler;
pub use http::{MockConnection, MockHttpClient, RecordedRequest};
