//! Clock trait abstraction.
//!
//! The supervisor reads the current instant to decide whether past failures
//! are forgiven, and sleeps between reconnects. Both go through [`Clock`] so
//! tests can simulate hours of failures without real delays.

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Source of time and delays.
#[async_trait]
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;

    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}
