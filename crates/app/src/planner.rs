//! Batch planner — splits each owner's workload into bounded batches.
//!
//! An owner whose workload fits one batch keeps the unsuffixed identity.
//! Larger workloads are partitioned in original order into consecutive
//! chunks of [`BATCH_CAPACITY`], and the chunks work under batch-qualified
//! identities `"Smith1"`, `"Smith2"`, … so they can run independently and
//! be recombined afterwards.

use traderdash_domain::batch::{BATCH_CAPACITY, Batch};

use crate::ports::OwnerWorkload;

/// Partition every owner's items into batches of at most [`BATCH_CAPACITY`].
///
/// Group order and item order are preserved. Empty groups yield no batch.
#[must_use]
pub fn plan_batches(grouped: Vec<OwnerWorkload>) -> Vec<Batch> {
    let mut batches = Vec::new();

    for OwnerWorkload { owner, items } in grouped {
        if items.is_empty() {
            continue;
        }
        if items.len() <= BATCH_CAPACITY {
            batches.push(Batch::new(owner, items));
            continue;
        }

        for (index, chunk) in items.chunks(BATCH_CAPACITY).enumerate() {
            batches.push(Batch::new(owner.with_batch_index(index + 1), chunk.to_vec()));
        }
    }

    batches
}
