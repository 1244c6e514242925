//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - Streaming HTTP client using reqwest
//! - [`RedisEventHandler`] - Per-type Redis lists (reference sink)
//! - [`JsonlFileHandler`] - Append-only JSON Lines file
//! - [`TokioClock`] - Real time
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted connection outcomes
//! - [`mock::MockClock`] - Simulated time
//! - [`mock::MemoryEventHandler`] - In-memory per-type lists

pub mod file_sink;
pub mod mock;
pub mod redis_sink;
pub mod reqwest_http;
pub mod tokio_clock;

pub use file_sink::JsonlFileHandler;
pub use mock::{MemoryEventHandler, MockClock, MockHttpClient};
pub use redis_sink::RedisEventHandler;
pub use reqwest_http::ReqwestHttpClient;
pub use tokio_clock::TokioClock;
