//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use serve_clone::http::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use serve_clone::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH};

const NOTES: &str = "\
NOTES:
    For single-file directories and automatic .html pages to be listed correctly,
    the serve config must set \"cleanUrls\": false

    For symlinked files to be downloaded correctly,
    the serve config must set \"symlinks\": true";

/// Clone a directory tree exposed through `serve` onto local disk.
///
/// serve-clone walks the JSON directory listings of a static file server and
/// downloads every file into the local folder, keeping the folder structure.
/// Files that already exist locally are skipped.
#[derive(Parser, Debug)]
#[command(name = "serve-clone")]
#[command(author, version, about)]
#[command(arg_required_else_help = true, after_help = NOTES)]
pub struct Args {
    /// URL of the serve server (e.g. http://localhost:5000)
    #[arg(short = 'u', long)]
    pub url: String,

    /// Folder the served directory contents are cloned into
    #[arg(short = 'f', long)]
    pub folder: PathBuf,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Maximum folder nesting depth to follow
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH as u16, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_depth: u16,

    /// HTTP connect timeout in seconds
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout: u64,

    /// HTTP read timeout in seconds (longest allowed stall while receiving data)
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub read_timeout: u64,

    /// Directory the error log is written to (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
