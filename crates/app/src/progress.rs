//! Progress tracker — shared counter of completed items.
//!
//! One tracker exists per run. Workers never touch it directly; the run
//! entry point records each batch as its outcome is delivered, so the lock
//! is only ever contended between completion callbacks.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use traderdash_domain::progress::ProgressSnapshot;

/// Monotone item counter with a fixed total and a start time.
pub struct ProgressTracker {
    total: usize,
    started_at: Instant,
    completed: Mutex<usize>,
}

impl ProgressTracker {
    /// Create a tracker for a run of `total` items, starting now.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            started_at: Instant::now(),
            completed: Mutex::new(0),
        }
    }

    /// Add a completed batch's item count and return the new snapshot.
    pub fn record_batch(&self, item_count: usize) -> ProgressSnapshot {
        let mut completed = self
            .completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *completed += item_count;
        ProgressSnapshot {
            completed: *completed,
            total: self.total,
            elapsed_secs: self.started_at.elapsed().as_secs(),
        }
    }

    /// The current snapshot without recording anything.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        let completed = *self
            .completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        ProgressSnapshot {
            completed,
            total: self.total,
            elapsed_secs: self.started_at.elapsed().as_secs(),
        }
    }

    /// Total items in the run, fixed at construction.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}
