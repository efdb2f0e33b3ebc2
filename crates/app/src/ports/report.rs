//! Reporting-sink port — live progress and final results for the operator.

use traderdash_domain::error::SessionError;
use traderdash_domain::outcome::OwnerReport;
use traderdash_domain::owner::OwnerName;
use traderdash_domain::progress::ProgressSnapshot;

/// Receives progress updates, per-batch errors, and the final report.
///
/// Called from the run entry point's completion loop only, never from
/// inside worker tasks, so implementations do not need interior locking
/// beyond `Send + Sync`.
pub trait ReportSink: Send + Sync {
    /// A batch completed; `snapshot` reflects the new totals.
    fn on_progress(&self, snapshot: ProgressSnapshot);

    /// A batch failed with a session-level error. Sibling batches are
    /// unaffected and the run continues.
    fn on_batch_error(&self, owner: &OwnerName, error: &SessionError);

    /// The run finished; `reports` are ordered with the sentinel owner last.
    fn on_run_complete(&self, reports: &[OwnerReport]);
}
