//! Batch — a bounded chunk of one owner's work items.

use serde::{Deserialize, Serialize};

use crate::owner::OwnerName;
use crate::work_item::WorkItem;

/// Maximum number of items one batch (and one dashboard) may hold.
pub const BATCH_CAPACITY: usize = 50;

/// An ordered chunk of at most [`BATCH_CAPACITY`] items, owned by exactly
/// one (possibly batch-qualified) owner and processed by one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Working identity for this chunk (`"Smith"` or `"Smith2"`).
    pub owner: OwnerName,
    /// Items in original input order.
    pub items: Vec<WorkItem>,
}

impl Batch {
    /// Create a batch.
    #[must_use]
    pub fn new(owner: OwnerName, items: Vec<WorkItem>) -> Self {
        Self { owner, items }
    }

    /// Number of items in this batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this batch holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_item_count() {
        let batch = Batch::new(
            OwnerName::new("Smith"),
            vec![WorkItem::new("|A| |v| |B|", "A", "B")],
        );
        assert_eq!(batch.len(), 1);
        assert!(!batch.is_empty());
    }
}
