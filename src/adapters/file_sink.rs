//! Newline-delimited JSON file sink.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::IngestResult;
use crate::events::RoutedRecord;
use crate::traits::EventHandler;

/// Event handler appending each valid record as one line of a file.
///
/// Records are written with surrounding whitespace trimmed, so the file is
/// valid JSON Lines regardless of how the stream delimited them.
pub struct JsonlFileHandler {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlFileHandler {
    /// Open `path` for appending, creating it if needed.
    pub async fn open(path: impl AsRef<Path>) -> IngestResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        info!("Appending events to {}", path.display());
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventHandler for JsonlFileHandler {
    async fn handle(&self, record: &str) {
        if let Err(e) = RoutedRecord::parse(record) {
            warn!("Received invalid event: {}\n{}", e, record);
            return;
        }

        let mut line = record.trim().to_string();
        line.push('\n');

        let mut file = self.file.lock().await;
        let written = async {
            file.write_all(line.as_bytes()).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            error!("Failed to write event to {}: {}", self.path.display(), e);
        }
    }
}
