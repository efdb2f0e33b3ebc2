//! Owner (trader) identity — base names and batch-qualified names.
//!
//! While an owner's workload is split into batches, each batch works under
//! a *suffixed* identity (`"Smith2"`). After all batches complete, results
//! are recombined under the *base* identity (`"Smith"`) by stripping the
//! trailing digits. Recovery is lossless for any base name that does not
//! itself end in digits; upstream normalization strips digits from owner
//! names, so planner input never ends in one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel identity for items with no assigned owner.
///
/// Always sorts last in the final report.
pub const UNASSIGNED: &str = "Unassigned";

/// An owner's name, either base (`"Smith"`) or batch-qualified (`"Smith2"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerName(String);

impl OwnerName {
    /// Wrap a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The sentinel owner for unassigned work.
    #[must_use]
    pub fn unassigned() -> Self {
        Self(UNASSIGNED.to_string())
    }

    /// View the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the sentinel identity.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.0 == UNASSIGNED
    }

    /// Append a batch index with no separator (`"Smith"` + 2 → `"Smith2"`).
    #[must_use]
    pub fn with_batch_index(&self, index: usize) -> Self {
        Self(format!("{}{index}", self.0))
    }

    /// Recover the base identity: strip trailing ASCII digits, then
    /// surrounding whitespace.
    #[must_use]
    pub fn base(&self) -> Self {
        let stripped = self.0.trim_end_matches(|c: char| c.is_ascii_digit());
        Self(stripped.trim().to_string())
    }

    /// The trailing batch index of a suffixed name, or zero for an
    /// unsuffixed name. Used to merge an owner's batches in ascending
    /// suffix order.
    #[must_use]
    pub fn batch_suffix(&self) -> usize {
        let digits: String = self
            .0
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .collect();
        let digits: String = digits.chars().rev().collect();
        digits.parse().unwrap_or(0)
    }

    /// Sort key for the final report: the sentinel sorts after every other
    /// owner, the rest lexicographically.
    #[must_use]
    pub fn report_key(&self) -> (bool, &str) {
        (self.is_unassigned(), self.as_str())
    }
}

impl fmt::Display for OwnerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for OwnerName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_append_batch_index_without_separator() {
        let owner = OwnerName::new("Smith");
        assert_eq!(owner.with_batch_index(2).as_str(), "Smith2");
    }

    #[test]
    fn should_recover_base_identity_from_suffixed_name() {
        let owner = OwnerName::new("Smith12");
        assert_eq!(owner.base().as_str(), "Smith");
    }

    #[test]
    fn should_keep_unsuffixed_name_unchanged_by_base() {
        let owner = OwnerName::new("Smith");
        assert_eq!(owner.base(), owner);
    }

    #[test]
    fn should_trim_whitespace_when_recovering_base() {
        let owner = OwnerName::new(" Smith 3");
        assert_eq!(owner.base().as_str(), "Smith");
    }

    #[test]
    fn should_be_lossless_roundtrip_for_names_not_ending_in_digits() {
        for name in ["Smith", "O'Neil", "van der Berg", "Unassigned"] {
            let owner = OwnerName::new(name);
            for index in 1..=4 {
                assert_eq!(owner.with_batch_index(index).base(), owner);
            }
        }
    }

    #[test]
    fn should_parse_trailing_batch_suffix() {
        assert_eq!(OwnerName::new("Smith12").batch_suffix(), 12);
        assert_eq!(OwnerName::new("Smith2").batch_suffix(), 2);
        assert_eq!(OwnerName::new("Smith").batch_suffix(), 0);
    }

    #[test]
    fn should_sort_unassigned_after_all_other_owners() {
        let mut owners = vec![
            OwnerName::unassigned(),
            OwnerName::new("Zimmer"),
            OwnerName::new("Abbot"),
        ];
        owners.sort_by(|a, b| a.report_key().cmp(&b.report_key()));
        let names: Vec<_> = owners.iter().map(OwnerName::as_str).collect();
        assert_eq!(names, vec!["Abbot", "Zimmer", "Unassigned"]);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let owner = OwnerName::new("Smith2");
        let json = serde_json::to_string(&owner).unwrap();
        assert_eq!(json, "\"Smith2\"");
        let parsed: OwnerName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, owner);
    }
}
