//! Run entry point — wires planner, pool, aggregator, and progress
//! together for one automation run.

use std::sync::Arc;

use tracing::{info, warn};
use traderdash_domain::error::RunError;
use traderdash_domain::id::RunId;

use crate::aggregator::ResultAggregator;
use crate::planner;
use crate::pool::{WorkerPool, default_concurrency};
use crate::ports::{ReportSink, SessionFactory, WorkloadSource};
use crate::progress::ProgressTracker;

/// Tunables for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Maximum concurrent batch workers; `None` uses the platform's
    /// available parallelism.
    pub max_concurrency: Option<usize>,
}

/// Run the full automation: load the workload, plan batches, process them
/// concurrently, and deliver progress and the final report through `sink`.
///
/// Batch failures are reported through [`ReportSink::on_batch_error`] and
/// do not fail the run; the failed batch's items simply never reach the
/// completed count.
///
/// # Errors
///
/// Fails when the workload cannot be loaded or when recombination detects
/// an internal defect (a planner/aggregator contract breach).
pub async fn run_automation<W, F, R>(
    source: &W,
    factory: Arc<F>,
    sink: &R,
    options: RunOptions,
) -> Result<(), RunError>
where
    W: WorkloadSource,
    F: SessionFactory,
    R: ReportSink,
{
    let run_id = RunId::new();

    let workload = source.load().await?;
    let total: usize = workload.iter().map(|group| group.items.len()).sum();
    let batches = planner::plan_batches(workload);

    let concurrency = options.max_concurrency.unwrap_or_else(default_concurrency);
    info!(
        %run_id,
        total_items = total,
        batches = batches.len(),
        concurrency,
        "starting automation run"
    );

    let aggregator = ResultAggregator::new(batches.iter().map(|b| b.owner.clone()));
    let tracker = ProgressTracker::new(total);
    let pool = WorkerPool::new(concurrency);

    let mut merge_error = None;
    pool.execute(factory, batches, |owner, result| match result {
        Ok(outcome) => {
            let snapshot = tracker.record_batch(outcome.item_count);
            if let Err(err) = aggregator.merge(outcome) {
                merge_error.get_or_insert(err);
            }
            sink.on_progress(snapshot);
        }
        Err(err) => {
            warn!(%run_id, owner = %owner, error = %err, "batch failed");
            sink.on_batch_error(&owner, &err);
        }
    })
    .await;

    if let Some(err) = merge_error {
        return Err(err.into());
    }

    let reports = aggregator.finalize()?;
    info!(%run_id, owners = reports.len(), "automation run complete");
    sink.on_run_complete(&reports);
    Ok(())
}
