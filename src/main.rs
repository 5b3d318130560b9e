//! CLI entry point for serve-clone.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serve_clone::{Mirror, MirrorConfig, ProgressObserver};
use tracing::{debug, info};

mod app;
mod cli;

use app::progress_bars::ProgressBars;
use app::{exit_handler, summary, terminal};
use cli::Args;

/// Process exit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every file is present locally.
    Success,
    /// The run finished but some transfers failed.
    Partial,
    /// The run could not start or the scrape failed.
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success | Self::Partial => 0,
            Self::Failure => 1,
        }
    }
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        ExitCode::from(exit.code())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = terminal::default_log_level(args.quiet, args.verbose);
    terminal::init_tracing(default_level, terminal::no_color_env_requested());

    debug!(?args, "CLI arguments parsed");

    match run(args).await {
        Ok(exit) => exit.into(),
        Err(err) => {
            debug!(error = ?err, "serve-clone failed");
            eprintln!("ERROR: {err:#}");
            ProcessExit::Failure.into()
        }
    }
}

async fn run(args: Args) -> Result<ProcessExit> {
    let config = MirrorConfig::new(args.url, args.folder)
        .with_concurrency(usize::from(args.concurrency))
        .with_max_depth(usize::from(args.max_depth))
        .with_timeouts(args.connect_timeout, args.read_timeout);

    let mirror = Mirror::prepare(&config).await?;
    info!(root = %mirror.root(), base_dir = %mirror.base_dir().display(), "starting clone");
    if !args.quiet {
        summary::print_banner(mirror.root(), mirror.base_dir());
    }

    let show_progress = terminal::should_show_progress(
        io::stderr().is_terminal(),
        args.quiet,
        args.no_progress,
        terminal::is_dumb_terminal(),
    );
    let progress: Arc<dyn ProgressObserver> = Arc::new(ProgressBars::new(show_progress));

    let mirror_run = mirror.run(progress).await?;

    let log_dir = match args.log_dir {
        Some(dir) => dir,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    summary::report_run(
        &mirror_run,
        mirror.root(),
        mirror.base_dir(),
        &log_dir,
        args.quiet,
    )
    .await?;

    Ok(exit_handler::determine_exit_outcome(&mirror_run.report))
}
