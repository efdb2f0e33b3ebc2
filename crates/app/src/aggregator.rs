//! Result aggregator — thread-safe accumulation and deterministic
//! recombination of batch outcomes.
//!
//! Workers complete in arbitrary order, so outcomes are keyed by their
//! batch-qualified owner, never by arrival order. [`finalize`] then runs a
//! single deterministic pass: reduce every suffixed owner to its base
//! identity, merge the owner's batches in ascending suffix order, renumber
//! the dashboard links `1..K`, and sort the report with the sentinel owner
//! last.
//!
//! [`finalize`]: ResultAggregator::finalize

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use tracing::debug;
use traderdash_domain::error::AggregationError;
use traderdash_domain::outcome::{BatchOutcome, NumberedLink, OwnerReport};
use traderdash_domain::owner::OwnerName;

/// Accumulates one [`BatchOutcome`] per batch, keyed by suffixed owner.
///
/// The lock is held only for the duration of the insert, never across a
/// suspension point.
pub struct ResultAggregator {
    expected: HashSet<OwnerName>,
    outcomes: Mutex<Vec<BatchOutcome>>,
}

impl ResultAggregator {
    /// Create an aggregator expecting outcomes for exactly the owners the
    /// planner produced.
    pub fn new(expected: impl IntoIterator<Item = OwnerName>) -> Self {
        Self {
            expected: expected.into_iter().collect(),
            outcomes: Mutex::new(Vec::new()),
        }
    }

    /// Record one batch's outcome.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::UnknownOwner`] when the outcome's owner
    /// was never produced by the planner — a contract breach that is fatal
    /// to the run.
    pub fn merge(&self, outcome: BatchOutcome) -> Result<(), AggregationError> {
        if !self.expected.contains(&outcome.owner) {
            return Err(AggregationError::UnknownOwner(
                outcome.owner.as_str().to_string(),
            ));
        }
        debug!(owner = %outcome.owner, links = outcome.links.len(), "merged batch outcome");
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outcome);
        Ok(())
    }

    /// Recombine all recorded outcomes into per-base-owner reports.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::EmptyBaseIdentity`] when a suffixed
    /// owner reduces to an empty name.
    pub fn finalize(self) -> Result<Vec<OwnerReport>, AggregationError> {
        let outcomes = self
            .outcomes
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let mut grouped: HashMap<OwnerName, Vec<BatchOutcome>> = HashMap::new();
        for outcome in outcomes {
            let base = outcome.owner.base();
            if base.as_str().is_empty() {
                return Err(AggregationError::EmptyBaseIdentity(
                    outcome.owner.as_str().to_string(),
                ));
            }
            grouped.entry(base).or_default().push(outcome);
        }

        let mut reports: Vec<OwnerReport> = grouped
            .into_iter()
            .map(|(owner, mut outcomes)| {
                outcomes.sort_by_key(|o| o.owner.batch_suffix());

                let total_items = outcomes.iter().map(|o| o.item_count).sum();
                let links = outcomes
                    .iter()
                    .flat_map(|o| o.links.iter().cloned())
                    .enumerate()
                    .map(|(i, link)| NumberedLink {
                        number: i + 1,
                        link,
                    })
                    .collect();
                let skipped = outcomes.into_iter().flat_map(|o| o.skipped).collect();

                OwnerReport {
                    owner,
                    total_items,
                    links,
                    skipped,
                }
            })
            .collect();

        reports.sort_by(|a, b| a.owner.report_key().cmp(&b.owner.report_key()));
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traderdash_domain::outcome::DashboardLink;

    fn outcome(owner: &str, items: usize, links: &[&str], skipped: &[&str]) -> BatchOutcome {
        BatchOutcome {
            owner: OwnerName::new(owner),
            item_count: items,
            links: links.iter().map(|url| DashboardLink::new(*url)).collect(),
            skipped: skipped.iter().map(ToString::to_string).collect(),
        }
    }

    fn aggregator(owners: &[&str]) -> ResultAggregator {
        ResultAggregator::new(owners.iter().map(|o| OwnerName::new(*o)))
    }

    #[test]
    fn should_recombine_suffixed_batches_under_base_owner() {
        let agg = aggregator(&["Smith1", "Smith2", "Smith3"]);
        // Merge out of completion order on purpose.
        agg.merge(outcome("Smith3", 20, &["https://d/c"], &[])).unwrap();
        agg.merge(outcome("Smith1", 50, &["https://d/a"], &[])).unwrap();
        agg.merge(outcome("Smith2", 50, &["https://d/b"], &[])).unwrap();

        let reports = agg.finalize().unwrap();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.owner.as_str(), "Smith");
        assert_eq!(report.total_items, 120);

        let urls: Vec<_> = reports[0]
            .links
            .iter()
            .map(|n| (n.number, n.link.as_str()))
            .collect();
        assert_eq!(
            urls,
            vec![(1, "https://d/a"), (2, "https://d/b"), (3, "https://d/c")]
        );
    }

    #[test]
    fn should_number_links_sequentially_regardless_of_merge_order() {
        let agg = aggregator(&["Jones1", "Jones2"]);
        agg.merge(outcome("Jones2", 10, &["https://d/2a", "https://d/2b"], &[]))
            .unwrap();
        agg.merge(outcome("Jones1", 50, &["https://d/1a"], &[])).unwrap();

        let reports = agg.finalize().unwrap();
        let numbers: Vec<_> = reports[0].links.iter().map(|n| n.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(reports[0].links[0].link.as_str(), "https://d/1a");
    }

    #[test]
    fn should_sort_unassigned_last_and_others_lexicographically() {
        let agg = aggregator(&["Zimmer", "Unassigned", "Abbot"]);
        agg.merge(outcome("Unassigned", 1, &[], &[])).unwrap();
        agg.merge(outcome("Zimmer", 1, &[], &[])).unwrap();
        agg.merge(outcome("Abbot", 1, &[], &[])).unwrap();

        let reports = agg.finalize().unwrap();
        let owners: Vec<_> = reports.iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(owners, vec!["Abbot", "Zimmer", "Unassigned"]);
    }

    #[test]
    fn should_concatenate_skip_lists_across_batches() {
        let agg = aggregator(&["Smith1", "Smith2"]);
        agg.merge(outcome("Smith2", 50, &[], &["|C| |v| |D|"])).unwrap();
        agg.merge(outcome("Smith1", 50, &[], &["|A| |v| |B|"])).unwrap();

        let reports = agg.finalize().unwrap();
        assert_eq!(
            reports[0].skipped,
            vec!["|A| |v| |B|".to_string(), "|C| |v| |D|".to_string()]
        );
    }

    #[test]
    fn should_reject_outcome_for_unknown_owner() {
        let agg = aggregator(&["Smith"]);
        let err = agg.merge(outcome("Nobody7", 1, &[], &[])).unwrap_err();
        assert!(matches!(err, AggregationError::UnknownOwner(name) if name == "Nobody7"));
    }

    #[test]
    fn should_fail_finalize_when_owner_reduces_to_empty_name() {
        let agg = aggregator(&["42"]);
        agg.merge(outcome("42", 1, &[], &[])).unwrap();
        let err = agg.finalize().unwrap_err();
        assert!(matches!(err, AggregationError::EmptyBaseIdentity(_)));
    }

    #[test]
    fn should_produce_empty_report_for_no_outcomes() {
        let agg = aggregator(&[]);
        assert!(agg.finalize().unwrap().is_empty());
    }

    #[test]
    fn should_merge_safely_from_multiple_threads() {
        let agg = std::sync::Arc::new(aggregator(&["Smith1", "Smith2", "Smith3", "Smith4"]));
        let handles: Vec<_> = (1..=4)
            .map(|i| {
                let agg = std::sync::Arc::clone(&agg);
                std::thread::spawn(move || {
                    agg.merge(outcome(&format!("Smith{i}"), 10, &[], &[])).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let agg = std::sync::Arc::into_inner(agg).unwrap();
        let reports = agg.finalize().unwrap();
        assert_eq!(reports[0].total_items, 40);
    }
}
