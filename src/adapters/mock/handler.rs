//! In-memory event handler for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::events::RoutedRecord;
use crate::traits::EventHandler;

/// Event handler storing records in per-type lists, newest first, the same
/// way the Redis sink pushes them.
///
/// Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventHandler {
    lists: Arc<Mutex<HashMap<String, Vec<String>>>>,
    dropped: Arc<Mutex<Vec<String>>>,
}

impl MemoryEventHandler {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records stored under `key`, newest first.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.lists
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Keys with at least one stored record.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lists.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Total records stored across all keys.
    pub fn len(&self) -> usize {
        self.lists.lock().unwrap().values().map(Vec::len).sum()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records that were rejected as malformed.
    pub fn dropped(&self) -> Vec<String> {
        self.dropped.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventHandler for MemoryEventHandler {
    async fn handle(&self, record: &str) {
        match RoutedRecord::parse(record) {
            Ok(routed) => {
                self.lists
                    .lock()
                    .unwrap()
                    .entry(routed.event_type)
                    .or_default()
                    .insert(0, record.to_string());
            }
            Err(e) => {
                warn!("Received invalid event: {}\n{}", e, record);
                self.dropped.lock().unwrap().push(record.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_are_pushed_newest_first() {
        let handler = MemoryEventHandler::new();
        handler.handle(r#"{"type":"digg","n":1}"#).await;
        handler.handle(r#"{"type":"digg","n":2}"#).await;
        handler.handle(r#"{"type":"comment"}"#).await;

        assert_eq!(
            handler.list("digg"),
            vec![
                r#"{"type":"digg","n":2}"#.to_string(),
                r#"{"type":"digg","n":1}"#.to_string()
            ]
        );
        assert_eq!(handler.keys(), vec!["comment", "digg"]);
        assert_eq!(handler.len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_records_are_dropped() {
        let handler = MemoryEventHandler::new();
        handler.handle("not-json").await;
        handler.handle(r#"{"no_type":true}"#).await;
        assert!(handler.is_empty());
        assert_eq!(handler.dropped().len(), 2);
    }
}
