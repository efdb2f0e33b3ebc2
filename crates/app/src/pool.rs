//! Worker pool — one batch runner per batch, bounded parallelism.
//!
//! Every batch becomes an independent task owning its own session; a
//! semaphore bounds how many run at once. Outcomes are handed to the
//! caller in completion order, and a failing batch never affects its
//! siblings.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;
use traderdash_domain::batch::Batch;
use traderdash_domain::error::SessionError;
use traderdash_domain::outcome::BatchOutcome;
use traderdash_domain::owner::OwnerName;

use crate::ports::SessionFactory;
use crate::runner;

/// Number of workers to run when the caller does not pick one.
#[must_use]
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Bounded pool of batch workers.
pub struct WorkerPool {
    max_concurrency: usize,
}

impl WorkerPool {
    /// Create a pool running at most `max_concurrency` batches at once.
    /// Zero is clamped to one.
    #[must_use]
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Run every batch to completion, opening one session per batch via
    /// `factory`, and hand each outcome to `on_complete` as it finishes
    /// (completion order, not submission order).
    ///
    /// A batch failure is delivered as an `Err` outcome; it does not
    /// cancel or delay sibling batches.
    pub async fn execute<F>(
        &self,
        factory: Arc<F>,
        batches: Vec<Batch>,
        mut on_complete: impl FnMut(OwnerName, Result<BatchOutcome, SessionError>),
    ) where
        F: SessionFactory,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for batch in batches {
            let factory = Arc::clone(&factory);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let owner = batch.owner.clone();
                let result = run_one(factory, semaphore, &batch).await;
                (owner, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((owner, result)) => on_complete(owner, result),
                // A panicking worker loses its batch but not the run.
                Err(err) => error!(error = %err, "batch worker task failed to join"),
            }
        }
    }
}

async fn run_one<F: SessionFactory>(
    factory: Arc<F>,
    semaphore: Arc<Semaphore>,
    batch: &Batch,
) -> Result<BatchOutcome, SessionError> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|_| SessionError::Transport("worker pool shut down".to_string()))?;
    let session = factory.open().await?;
    runner::run_batch(session, batch).await
}
