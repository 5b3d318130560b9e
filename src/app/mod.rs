//! Binary-only composition: progress rendering, summary output, exit codes.

pub(crate) mod exit_handler;
pub(crate) mod progress_bars;
pub(crate) mod summary;
pub(crate) mod terminal;
