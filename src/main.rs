mod cli;
mod error;
mod logging;
mod model;
mod orchestrator;
mod payload;
mod remote;
mod store;
mod text_summary;
mod theme;
#[cfg(feature = "tui")]
mod tui;
mod view;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let headless = args.is_headless();
    logging::init_logging(args.log_file.as_deref(), !headless)?;

    cli::run(args).await?;
    if headless {
        // --json/--text may leave request tasks in flight; don't wait on runtime shutdown.
        std::process::exit(0);
    }
    Ok(())
}
