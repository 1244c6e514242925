//! Redis event handler: the reference sink.
//!
//! Each record is pushed onto a Redis list named after its `type` field:
//!
//! ```text
//! LPUSH digg '{"type":"digg",...}'
//! ```

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, error, info, warn};

use crate::config::RedisConfig;
use crate::error::IngestResult;
use crate::events::RoutedRecord;
use crate::traits::EventHandler;

/// Event handler that LPUSHes raw records into per-type Redis lists.
///
/// Uses a [`ConnectionManager`], which re-establishes the Redis connection on
/// its own after failures.
#[derive(Clone)]
pub struct RedisEventHandler {
    conn: ConnectionManager,
}

impl RedisEventHandler {
    /// Connect to Redis and select the configured database.
    pub async fn connect(config: &RedisConfig) -> IngestResult<Self> {
        let url = config.url();
        info!("Connecting to Redis at {}", url);
        let client = redis::Client::open(url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl EventHandler for RedisEventHandler {
    async fn handle(&self, record: &str) {
        debug!("{}", record.trim_end());

        let routed = match RoutedRecord::parse(record) {
            Ok(routed) => routed,
            Err(e) => {
                warn!("Received invalid event: {}\n{}", e, record);
                return;
            }
        };

        let mut conn = self.conn.clone();
        let pushed: redis::RedisResult<i64> = conn.lpush(&routed.event_type, routed.raw).await;
        if let Err(e) = pushed {
            error!(
                "Failed to store {} event in Redis, dropping it: {}",
                routed.event_type, e
            );
        }
    }
}
