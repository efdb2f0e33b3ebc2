//! Run artifacts — per-batch outcomes and recombined per-owner reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::owner::OwnerName;

/// A dashboard URL produced after committing a batch's selection set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardLink(String);

impl DashboardLink {
    /// Wrap a dashboard URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// View the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DashboardLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything one batch worker produced: the dashboard links it created and
/// the names of the items it could not match. Produced exactly once per
/// batch, by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Batch-qualified owner this outcome belongs to.
    pub owner: OwnerName,
    /// Item count of the batch, used for progress accounting.
    pub item_count: usize,
    /// Dashboard links in production order.
    pub links: Vec<DashboardLink>,
    /// Names of items that matched none of their candidate terms.
    pub skipped: Vec<String>,
}

/// A numbered dashboard link in the final report (`1..K` per base owner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedLink {
    /// Display number, sequential per base owner.
    pub number: usize,
    /// The dashboard URL.
    pub link: DashboardLink,
}

/// Per-base-owner aggregate formed by merging all of the owner's batch
/// outcomes in ascending suffix order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerReport {
    /// Base owner identity.
    pub owner: OwnerName,
    /// Total items across all of the owner's batches.
    pub total_items: usize,
    /// Dashboard links renumbered `1..K` for display.
    pub links: Vec<NumberedLink>,
    /// Skipped item names across all batches.
    pub skipped: Vec<String>,
}
