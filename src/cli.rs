use crate::model::DashboardConfig;
use crate::remote::SimulationApi;
use crate::view::{reconcile, DashboardView};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let mut out = std::io::LineWriter::new(std::io::stdout().lock());
        let mut err = std::io::LineWriter::new(std::io::stderr().lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{msg}");
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{msg}");
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "soccercloud-dashboard",
    version,
    about = "Live terminal dashboard for a SoccerCloud simulation server"
)]
pub struct Cli {
    /// Base URL of the SoccerCloud JSON API
    #[arg(long, default_value = "http://127.0.0.1:9009/api")]
    pub base_url: String,

    /// Interval between list refreshes
    #[arg(long, default_value = "1s")]
    pub poll_interval: humantime::Duration,

    /// Print the simulation list as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text summary of the simulation list and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Append logs to this file (the TUI never logs to the terminal)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Colour theme override: dark or light
    #[arg(long)]
    pub theme: Option<String>,

    /// Directory that CSV exports are written into
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Preferences file (defaults to the user config directory)
    #[arg(long)]
    pub prefs: Option<PathBuf>,
}

impl Cli {
    pub fn is_headless(&self) -> bool {
        self.json || self.text || cfg!(not(feature = "tui"))
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!("--json and --text are mutually exclusive"));
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args).await;
        }
    }

    if args.json {
        return run_json(args).await;
    }

    run_text(args).await
}

/// Build a `DashboardConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> DashboardConfig {
    DashboardConfig {
        base_url: args.base_url.clone(),
        poll_interval: Duration::from(args.poll_interval),
        user_agent: format!("soccercloud-dashboard/{}", env!("CARGO_PKG_VERSION")),
        export_dir: args.export_dir.clone(),
        prefs_path: args.prefs.clone().or_else(crate::theme::prefs_path),
    }
}

async fn run_json(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let api = SimulationApi::new(&cfg)?;
    let (out_tx, out_handle) = spawn_output_writer();

    let sims = api
        .list_simulations()
        .await
        .context("failed to list simulations")?;
    let out = serde_json::to_string_pretty(&sims)?;
    let _ = out_tx.send(OutputLine::Stdout(out));

    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

async fn run_text(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let api = SimulationApi::new(&cfg)?;
    let (out_tx, out_handle) = spawn_output_writer();

    // Both exchanges are independent; issue them together.
    let (config, sims) = futures::future::join(api.config(), api.list_simulations()).await;
    let demo = match config {
        Ok(server) => server.demo,
        Err(e) => {
            warn!(error = %e, "server config unavailable");
            let _ = out_tx.send(OutputLine::Stderr(format!("Config failed: {e}")));
            false
        }
    };

    let sims = sims.context("failed to list simulations")?;
    let mut view = DashboardView::new();
    reconcile(&mut view, &sims);

    let summary = crate::text_summary::build_text_summary(&view, demo);
    for line in summary.lines {
        let _ = out_tx.send(OutputLine::Stdout(line));
    }

    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}
