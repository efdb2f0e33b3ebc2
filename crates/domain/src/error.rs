//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.
//! "Soft misses" — an item matching none of its candidate search terms —
//! are deliberately **not** errors; they are recorded as skips.

/// Failure of one automation session.
///
/// A session error aborts the batch that owns the session and nothing
/// else; sibling batches keep running.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Login was rejected or the login form never appeared.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Navigation to the target application failed.
    #[error("navigation failed: {0}")]
    Navigation(String),
    /// An element did not appear within the per-call timeout.
    #[error("timed out after {timeout_ms}ms waiting for `{selector}`")]
    WaitTimeout {
        /// Selector that was awaited.
        selector: String,
        /// Per-call timeout that elapsed.
        timeout_ms: u64,
    },
    /// The underlying transport (HTTP to the driver) failed.
    #[error("session transport error: {0}")]
    Transport(String),
    /// The driver answered with something the client could not interpret.
    #[error("session protocol error: {0}")]
    Protocol(String),
}

/// Internal defect detected while recombining batch outcomes.
///
/// Indicates a contract breach between planner and aggregator, so it is
/// fatal to the whole run.
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    /// A suffixed owner reduced to a base identity with an empty name.
    #[error("owner `{0}` reduces to an empty base identity")]
    EmptyBaseIdentity(String),
    /// An outcome arrived for an owner the planner never produced.
    #[error("outcome for unknown owner `{0}`")]
    UnknownOwner(String),
}

/// Failure of a whole automation run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Loading the workload from the input source failed.
    #[error("failed to load workload: {0}")]
    Input(String),
    /// Recombination detected an internal defect.
    #[error("aggregation invariant violated")]
    Aggregation(#[from] AggregationError),
}
