//! # traderdash-adapter-virtual
//!
//! Simulated automation session for tests, demos, and `dry_run` mode.
//! No browser or driver binary is involved; "searching" is resolved
//! against a configurable match rule and dashboard links are synthesized
//! with a per-browser sequence number.
//!
//! ## Dependency rule
//!
//! Depends on `traderdash-app` (port traits) and `traderdash-domain` only.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use traderdash_app::ports::{AutomationSession, SessionFactory};
use traderdash_domain::error::SessionError;
use traderdash_domain::outcome::DashboardLink;

/// Decides which search terms resolve to a selectable result.
#[derive(Debug, Clone)]
pub enum MatchRule {
    /// Every non-empty search matches.
    Everything,
    /// No search ever matches.
    Nothing,
    /// Only the listed terms match.
    Terms(HashSet<String>),
}

impl MatchRule {
    fn matches(&self, term: &str) -> bool {
        match self {
            Self::Everything => !term.is_empty(),
            Self::Nothing => false,
            Self::Terms(terms) => terms.contains(term),
        }
    }
}

/// Simulated browser; hands out [`VirtualSession`]s.
pub struct VirtualBrowser {
    rule: MatchRule,
    refuse_login: bool,
    link_seq: Arc<AtomicUsize>,
}

impl VirtualBrowser {
    /// Browser whose sessions match every non-empty search.
    #[must_use]
    pub fn matching_everything() -> Self {
        Self::with_rule(MatchRule::Everything)
    }

    /// Browser with a custom match rule.
    #[must_use]
    pub fn with_rule(rule: MatchRule) -> Self {
        Self {
            rule,
            refuse_login: false,
            link_seq: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make [`SessionFactory::open`] fail with an authentication error.
    #[must_use]
    pub fn refusing_login(mut self) -> Self {
        self.refuse_login = true;
        self
    }
}

impl SessionFactory for VirtualBrowser {
    type Session = VirtualSession;

    fn open(&self) -> impl Future<Output = Result<Self::Session, SessionError>> + Send {
        let refuse = self.refuse_login;
        let session = VirtualSession {
            rule: self.rule.clone(),
            link_seq: Arc::clone(&self.link_seq),
            search_text: String::new(),
            selected: 0,
            closed: false,
        };
        async move {
            if refuse {
                Err(SessionError::Authentication(
                    "virtual browser configured to refuse login".to_string(),
                ))
            } else {
                Ok(session)
            }
        }
    }
}

/// One simulated session.
pub struct VirtualSession {
    rule: MatchRule,
    link_seq: Arc<AtomicUsize>,
    search_text: String,
    selected: usize,
    closed: bool,
}

impl VirtualSession {
    /// Number of results currently selected.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Transport("session already closed".to_string()));
        }
        Ok(())
    }
}

impl AutomationSession for VirtualSession {
    fn set_search_text(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Result<(), SessionError>> + Send {
        let result = self.ensure_open();
        if result.is_ok() {
            self.search_text = text.to_string();
        }
        async move { result }
    }

    fn select_secondary_result(
        &mut self,
    ) -> impl Future<Output = Result<bool, SessionError>> + Send {
        let result = self.ensure_open().map(|()| {
            let matched = self.rule.matches(&self.search_text);
            if matched {
                self.selected += 1;
            }
            matched
        });
        async move { result }
    }

    fn read_dashboard_link(
        &mut self,
    ) -> impl Future<Output = Result<DashboardLink, SessionError>> + Send {
        let result = self.ensure_open().map(|()| {
            let n = self.link_seq.fetch_add(1, Ordering::SeqCst) + 1;
            DashboardLink::new(format!("virtual://dashboard/{n}"))
        });
        async move { result }
    }

    fn clear_all_selections(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        let result = self.ensure_open();
        if result.is_ok() {
            self.selected = 0;
        }
        async move { result }
    }

    fn refresh(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        let result = self.ensure_open();
        async move { result }
    }

    fn close(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        self.closed = true;
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_match_everything_rule_for_non_empty_search() {
        let browser = VirtualBrowser::matching_everything();
        let mut session = browser.open().await.unwrap();

        session.set_search_text("|A| |v| |B|").await.unwrap();
        assert!(session.select_secondary_result().await.unwrap());

        session.set_search_text("").await.unwrap();
        assert!(!session.select_secondary_result().await.unwrap());
    }

    #[tokio::test]
    async fn should_match_only_configured_terms() {
        let terms: HashSet<String> = ["Arsenal".to_string()].into_iter().collect();
        let browser = VirtualBrowser::with_rule(MatchRule::Terms(terms));
        let mut session = browser.open().await.unwrap();

        session.set_search_text("Spurs").await.unwrap();
        assert!(!session.select_secondary_result().await.unwrap());

        session.set_search_text("Arsenal").await.unwrap();
        assert!(session.select_secondary_result().await.unwrap());
    }

    #[tokio::test]
    async fn should_synthesize_sequential_dashboard_links_across_sessions() {
        let browser = VirtualBrowser::matching_everything();
        let mut first = browser.open().await.unwrap();
        let mut second = browser.open().await.unwrap();

        let a = first.read_dashboard_link().await.unwrap();
        let b = second.read_dashboard_link().await.unwrap();
        assert_eq!(a.as_str(), "virtual://dashboard/1");
        assert_eq!(b.as_str(), "virtual://dashboard/2");
    }

    #[tokio::test]
    async fn should_reset_selection_count_on_clear() {
        let browser = VirtualBrowser::matching_everything();
        let mut session = browser.open().await.unwrap();

        session.set_search_text("x").await.unwrap();
        session.select_secondary_result().await.unwrap();
        assert_eq!(session.selected(), 1);

        session.clear_all_selections().await.unwrap();
        assert_eq!(session.selected(), 0);
    }

    #[tokio::test]
    async fn should_refuse_login_when_configured() {
        let browser = VirtualBrowser::matching_everything().refusing_login();
        let result = browser.open().await;
        assert!(matches!(result, Err(SessionError::Authentication(_))));
    }

    #[tokio::test]
    async fn should_error_on_use_after_close() {
        let browser = VirtualBrowser::matching_everything();
        let mut session = browser.open().await.unwrap();
        session.close().await.unwrap();
        let result = session.set_search_text("x").await;
        assert!(matches!(result, Err(SessionError::Transport(_))));
    }
}
