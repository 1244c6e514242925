//! Digg stream ingestion worker.
//!
//! Consumes the newline-delimited JSON event stream, frames complete records
//! out of arbitrarily chunked bytes, and hands each one to an event handler,
//! reconnecting with backoff whenever the connection fails.
//!
//! - [`framer`] - bytes to complete JSON records
//! - [`supervisor`] - connection lifecycle and backoff
//! - [`traits`] / [`adapters`] - HTTP, sink and clock seams and their implementations

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod framer;
pub mod logging;
pub mod supervisor;
pub mod traits;
