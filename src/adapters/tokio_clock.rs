//! Wall-clock implementation of [`Clock`].

use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::traits::Clock;

/// Real time: `Instant::now()` and `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
