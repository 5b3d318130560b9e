//! Exit code logic for the serve-clone process.
//!
//! Single responsibility: map a run result to the process exit outcome.

use serve_clone::Report;

use crate::ProcessExit;

/// Determines the process exit outcome from a finished run's report.
///
/// Transfer failures never fail the process; they are reported in the
/// summary and the error log.
pub(crate) fn determine_exit_outcome(report: &Report) -> ProcessExit {
    if report.has_failures() {
        ProcessExit::Partial
    } else {
        ProcessExit::Success
    }
}
