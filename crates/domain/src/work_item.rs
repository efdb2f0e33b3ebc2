//! Work item — one sporting event to select on the target application.

use serde::{Deserialize, Serialize};

/// One event assigned to an owner.
///
/// `name` is the formatted search name (e.g. `|Arsenal| |v| |Spurs|`),
/// `home_label` / `away_label` the raw team names used as fallback search
/// terms. An item without an away label cannot be matched and is recorded
/// as skipped without touching the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Formatted event name, tried first when searching.
    pub name: String,
    /// Home-side label, tried second.
    pub home_label: String,
    /// Away-side label, tried third. Absent for malformed events.
    pub away_label: Option<String>,
}

impl WorkItem {
    /// Create an item with both side labels.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        home_label: impl Into<String>,
        away_label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            home_label: home_label.into(),
            away_label: Some(away_label.into()),
        }
    }

    /// Create an item with no away label (unmatchable, always skipped).
    #[must_use]
    pub fn without_away(name: impl Into<String>, home_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            home_label: home_label.into(),
            away_label: None,
        }
    }

    /// Whether this item can be matched at all.
    #[must_use]
    pub fn is_matchable(&self) -> bool {
        self.away_label.is_some()
    }

    /// Candidate search terms in fixed priority order: formatted name,
    /// home label, away label.
    #[must_use]
    pub fn candidate_terms(&self) -> Vec<&str> {
        let mut terms = vec![self.name.as_str(), self.home_label.as_str()];
        if let Some(away) = &self.away_label {
            terms.push(away.as_str());
        }
        terms
    }
}
