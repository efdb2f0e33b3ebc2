//! Workload-source port — where the grouped work items come from.
//!
//! Upstream is responsible for date filtering, dedup, and owner-name
//! normalization (digit and parenthetical stripping). The core only
//! requires ordered groups.

use std::future::Future;

use traderdash_domain::error::RunError;
use traderdash_domain::owner::OwnerName;
use traderdash_domain::work_item::WorkItem;

/// One owner's items, in the order they should be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerWorkload {
    /// Base owner identity (never batch-suffixed at this stage).
    pub owner: OwnerName,
    /// Items in input order (e.g. by scheduled time).
    pub items: Vec<WorkItem>,
}

impl OwnerWorkload {
    /// Create a workload group.
    #[must_use]
    pub fn new(owner: OwnerName, items: Vec<WorkItem>) -> Self {
        Self { owner, items }
    }
}

/// Supplies the full workload for one run, grouped by base owner.
pub trait WorkloadSource {
    /// Load all work items, grouped and ordered.
    fn load(&self) -> impl Future<Output = Result<Vec<OwnerWorkload>, RunError>> + Send;
}
