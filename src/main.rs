use clap::Parser;
use color_eyre::Result;
use digg_stream::cli::{self, Args};
use digg_stream::logging;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    logging::init(args.log_format)?;

    cli::run(args).await
}
