//! Automation-session port — the UI-automation capability a batch drives.
//!
//! A session wraps one live browser (or simulated) connection to the
//! target application. Sessions are never shared between batch workers:
//! each batch opens its own session through a [`SessionFactory`] and
//! closes it when the batch finishes, successfully or not.

use std::future::Future;

use traderdash_domain::error::SessionError;
use traderdash_domain::outcome::DashboardLink;

/// One live automation session against the target application.
///
/// All methods may suspend on the underlying UI calls; they block the
/// owning batch task but never other tasks. Every error a session returns
/// is fatal to its batch — "no selectable result" is expressed through
/// [`select_secondary_result`](Self::select_secondary_result) returning
/// `false`, never through an error.
pub trait AutomationSession: Send + 'static {
    /// Replace the contents of the search field with `text`.
    ///
    /// Passing an empty string clears the field.
    fn set_search_text(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Attempt to select the result at the fixed secondary position.
    ///
    /// Returns `Ok(false)` when no selectable result exists for the
    /// current search text (a soft miss, not an error).
    fn select_secondary_result(
        &mut self,
    ) -> impl Future<Output = Result<bool, SessionError>> + Send;

    /// Read the dashboard link for the current selection set.
    fn read_dashboard_link(
        &mut self,
    ) -> impl Future<Output = Result<DashboardLink, SessionError>> + Send;

    /// Deselect everything so the next dashboard starts from a clean state.
    fn clear_all_selections(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Reload the current page.
    fn refresh(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Release the session and its underlying resources.
    fn close(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// Opens authenticated sessions, one per batch.
///
/// Implementations carry whatever the session needs to come up ready for
/// searching: endpoint URLs, credentials, timeouts. [`open`](Self::open)
/// must return a session that is already logged in with the search UI
/// reachable.
pub trait SessionFactory: Send + Sync + 'static {
    /// Concrete session type this factory produces.
    type Session: AutomationSession;

    /// Open, authenticate, and prepare a fresh session.
    fn open(&self) -> impl Future<Output = Result<Self::Session, SessionError>> + Send;
}
