//! Progress snapshot reported to the operator after each batch completes.

use serde::{Deserialize, Serialize};

/// A point-in-time view of run progress.
///
/// `completed` is monotonically non-decreasing across a run and reaches
/// `total` exactly once, after the last successful batch. Items of failed
/// batches are never counted, so a run with batch errors finishes below
/// `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Items processed so far.
    pub completed: usize,
    /// Total items in the run, fixed at start.
    pub total: usize,
    /// Whole seconds elapsed since the run started.
    pub elapsed_secs: u64,
}
