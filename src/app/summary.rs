//! Human-readable run output: banner, summary counts and the error log notice.

use std::path::Path;

use anyhow::{Context, Result};
use serve_clone::{MirrorRun, Report, write_error_log};
use url::Url;

const CLEAN_URLS_HINT: &str = "Errors typically occur when serve is not running with:\n        \
     \"cleanUrls\": false and \"symlinks\": true";

/// Prints the line announcing what is about to be mirrored.
pub(crate) fn print_banner(root: &Url, base_dir: &Path) {
    println!("INFO: Cloning {root} into {}", base_dir.display());
}

/// Returns the summary lines for `report`; zero counts are omitted.
pub(crate) fn summary_lines(report: &Report) -> Vec<String> {
    let mut lines = vec!["INFO: Clone complete".to_string()];
    if report.downloaded > 0 {
        lines.push(format!(
            "INFO:   Downloaded         {:>8} files",
            report.downloaded
        ));
    }
    if report.already_present > 0 {
        lines.push(format!(
            "INFO:   Already Downloaded {:>8} files",
            report.already_present
        ));
    }
    if report.failed > 0 {
        lines.push(format!("INFO:   Errors             {:>8} files", report.failed));
    }
    lines
}

/// Prints the summary unless `quiet` and, when any transfer failed, writes the error log.
pub(crate) async fn report_run(
    run: &MirrorRun,
    root: &Url,
    base_dir: &Path,
    log_dir: &Path,
    quiet: bool,
) -> Result<()> {
    if !quiet {
        for line in summary_lines(&run.report) {
            println!("{line}");
        }
    }

    if run.report.has_failures() {
        let path = write_error_log(log_dir, root, base_dir, run.started_at, &run.report)
            .await
            .with_context(|| format!("failed to write error log in {}", log_dir.display()))?;
        eprintln!("ERR:  Error log: {}", path.display());
        eprintln!("WARN: {CLEAN_URLS_HINT}");
    }
    Ok(())
}
