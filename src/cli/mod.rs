//! CLI entry point for the worker binary.
//!
//! Parses arguments, opens the selected sink, and runs the supervisor until
//! Ctrl-C.
//!
//! ```ignore
//! use clap::Parser;
//! use digg_stream::cli::{run, Args};
//!
//! run(Args::parse()).await?;
//! ```

pub mod args;

pub use args::{Args, FramingArg};

use color_eyre::{Report, Result};
use tracing::{error, info};

use crate::adapters::{JsonlFileHandler, RedisEventHandler, ReqwestHttpClient, TokioClock};
use crate::config::StreamConfig;
use crate::error::IngestError;
use crate::supervisor::StreamSupervisor;
use crate::traits::EventHandler;

/// Run the worker described by `args`.
///
/// Invalid event types are rejected before the sink is opened or any
/// connection is made.
pub async fn run(args: Args) -> Result<()> {
    let config = args.stream_config();
    config.validate().map_err(startup_error)?;

    match &args.output {
        Some(path) => {
            let handler = JsonlFileHandler::open(path).await.map_err(startup_error)?;
            supervise(config, handler).await
        }
        None => {
            let handler = RedisEventHandler::connect(&args.redis_config())
                .await
                .map_err(startup_error)?;
            supervise(config, handler).await
        }
    }
}

/// Log a startup failure with its category and attach the recovery hint.
fn startup_error(err: IngestError) -> Report {
    let category = err.category();
    error!("Cannot start ({} error): {}", category, err);
    Report::new(err).wrap_err(format!(
        "{} error. {}",
        category,
        category.recovery_hint()
    ))
}

async fn supervise<H: EventHandler>(config: StreamConfig, handler: H) -> Result<()> {
    let mut supervisor = StreamSupervisor::new(config, ReqwestHttpClient::new(), handler, TokioClock);

    let shutdown = supervisor.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            shutdown.trigger();
        }
    });

    supervisor.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_startup_error_carries_category_and_hint() {
        let report = startup_error(IngestError::InvalidEventType("bogus".to_string()));
        let outer = report.to_string();
        assert!(outer.starts_with("configuration error."));
        assert!(outer.contains("digg, comment or submission"));
        assert!(report
            .chain()
            .any(|cause| cause.to_string() == "bogus is not a legal event type"));
    }

    #[tokio::test]
    async fn test_run_rejects_illegal_type_before_opening_sink() {
        let args = Args::try_parse_from(["digg-stream", "digg", "bogus", "--port", "1"]).unwrap();
        let report = run(args).await.unwrap_err();
        assert!(report.to_string().starts_with("configuration error."));
    }
}
