//! Command-line arguments for the worker binary.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{RedisConfig, StreamConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
use crate::framer::FramingMode;
use crate::logging::LogFormat;

/// Record boundary strategy, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FramingArg {
    /// Whole buffer must parse as one value
    WholeBuffer,
    /// Split on the first balanced top-level value
    Balanced,
}

impl From<FramingArg> for FramingMode {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::WholeBuffer => FramingMode::WholeBuffer,
            FramingArg::Balanced => FramingMode::Balanced,
        }
    }
}

/// Stream Digg events into Redis.
///
/// Examples:
///
///   digg-stream
///   digg-stream comment digg
///   digg-stream --host 127.0.0.1 --db 4 --port 6379
///   digg-stream submission --db 6
#[derive(Debug, Clone, Parser)]
#[command(name = "digg-stream", version, about, long_about = None)]
pub struct Args {
    /// Event types to stream: digg, comment, submission (default: all)
    pub types: Vec<String>,

    /// Redis host
    #[arg(short = 'H', long, default_value = "localhost")]
    pub host: String,

    /// Redis port
    #[arg(short, long, default_value_t = 6379)]
    pub port: u16,

    /// Redis database index
    #[arg(short, long, default_value_t = 0)]
    pub db: i64,

    /// Streaming service base URL
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Append events to this JSON Lines file instead of Redis
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// How record boundaries are found in the stream
    #[arg(long, value_enum, default_value_t = FramingArg::WholeBuffer)]
    pub framing: FramingArg,

    /// Reconnect when no data arrives for this many seconds (0 waits forever)
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    pub idle_timeout: u64,

    /// Discard buffered data beyond this many bytes without a complete record
    #[arg(long, value_name = "BYTES")]
    pub max_buffer: Option<usize>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Args {
    /// Streaming configuration described by these arguments.
    pub fn stream_config(&self) -> StreamConfig {
        let idle_timeout = match self.idle_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        StreamConfig::default()
            .with_base_url(self.url.clone())
            .with_event_types(self.types.iter().cloned())
            .with_framing(self.framing.into())
            .with_idle_timeout(idle_timeout)
            .with_max_buffer_bytes(self.max_buffer)
    }

    /// Redis sink configuration described by these arguments.
    pub fn redis_config(&self) -> RedisConfig {
        RedisConfig {
            host: self.host.clone(),
            port: self.port,
            db: self.db,
        }
    }
}
