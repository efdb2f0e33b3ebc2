//! Event matcher — deterministic fallback search-and-select per item.
//!
//! Candidate terms are tried in fixed priority order: the formatted event
//! name, the home label, the away label. Each attempt replaces the search
//! text and tries to select the result at the fixed secondary position.
//! The first selectable result wins; if every term comes up empty the item
//! is a soft miss and gets recorded as skipped by the caller.
//!
//! The secondary-position selector is applied without verifying that the
//! selected row corresponds to the searched event; this mirrors the target
//! application's behaviour where the first row is a header.

use tracing::debug;
use traderdash_domain::error::SessionError;
use traderdash_domain::work_item::WorkItem;

use crate::ports::AutomationSession;

/// Try to select `item` through `session`.
///
/// Returns `Ok(true)` on the first candidate term with a selectable
/// result, `Ok(false)` when all terms miss. Callers must not invoke this
/// for items without an away label; those are skipped up front.
///
/// # Errors
///
/// Propagates only session-level failures; "no result" is not an error.
pub async fn try_match<S: AutomationSession>(
    session: &mut S,
    item: &WorkItem,
) -> Result<bool, SessionError> {
    for term in item.candidate_terms() {
        session.set_search_text(term).await?;
        if session.select_secondary_result().await? {
            return Ok(true);
        }
        debug!(item = %item.name, term, "no selectable result, falling through");
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use traderdash_domain::outcome::DashboardLink;

    // ── Scripted session ───────────────────────────────────────────

    /// Session fake that matches only the configured search terms and
    /// records every call it receives.
    struct ScriptedSession {
        matching_terms: Vec<String>,
        searches: Vec<String>,
        selects: usize,
    }

    impl ScriptedSession {
        fn matching(terms: &[&str]) -> Self {
            Self {
                matching_terms: terms.iter().map(ToString::to_string).collect(),
                searches: Vec::new(),
                selects: 0,
            }
        }
    }

    impl AutomationSession for ScriptedSession {
        fn set_search_text(
            &mut self,
            text: &str,
        ) -> impl Future<Output = Result<(), SessionError>> + Send {
            self.searches.push(text.to_string());
            async { Ok(()) }
        }
        fn select_secondary_result(
            &mut self,
        ) -> impl Future<Output = Result<bool, SessionError>> + Send {
            self.selects += 1;
            let current = self.searches.last().cloned().unwrap_or_default();
            let matched = self.matching_terms.contains(&current);
            async move { Ok(matched) }
        }
        fn read_dashboard_link(
            &mut self,
        ) -> impl Future<Output = Result<DashboardLink, SessionError>> + Send {
            async { Ok(DashboardLink::new("https://example.test/d/0")) }
        }
        fn clear_all_selections(
            &mut self,
        ) -> impl Future<Output = Result<(), SessionError>> + Send {
            async { Ok(()) }
        }
        fn refresh(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
            async { Ok(()) }
        }
        fn close(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
            async { Ok(()) }
        }
    }

    fn item() -> WorkItem {
        WorkItem::new("|Arsenal| |v| |Spurs|", "Arsenal", "Spurs")
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_match_on_formatted_name_without_trying_fallbacks() {
        let mut session = ScriptedSession::matching(&["|Arsenal| |v| |Spurs|"]);
        let matched = try_match(&mut session, &item()).await.unwrap();
        assert!(matched);
        assert_eq!(session.searches, vec!["|Arsenal| |v| |Spurs|"]);
        assert_eq!(session.selects, 1);
    }

    #[tokio::test]
    async fn should_fall_through_to_home_label_when_name_misses() {
        let mut session = ScriptedSession::matching(&["Arsenal"]);
        let matched = try_match(&mut session, &item()).await.unwrap();
        assert!(matched);
        assert_eq!(session.searches, vec!["|Arsenal| |v| |Spurs|", "Arsenal"]);
    }

    #[tokio::test]
    async fn should_fall_through_to_away_label_as_last_resort() {
        let mut session = ScriptedSession::matching(&["Spurs"]);
        let matched = try_match(&mut session, &item()).await.unwrap();
        assert!(matched);
        assert_eq!(
            session.searches,
            vec!["|Arsenal| |v| |Spurs|", "Arsenal", "Spurs"]
        );
    }

    #[tokio::test]
    async fn should_report_soft_miss_when_every_term_fails() {
        let mut session = ScriptedSession::matching(&[]);
        let matched = try_match(&mut session, &item()).await.unwrap();
        assert!(!matched);
        assert_eq!(session.selects, 3);
    }

    #[tokio::test]
    async fn should_propagate_session_error_from_search() {
        struct FailingSession;
        impl AutomationSession for FailingSession {
            fn set_search_text(
                &mut self,
                _text: &str,
            ) -> impl Future<Output = Result<(), SessionError>> + Send {
                async { Err(SessionError::Navigation("connection reset".to_string())) }
            }
            fn select_secondary_result(
                &mut self,
            ) -> impl Future<Output = Result<bool, SessionError>> + Send {
                async { Ok(false) }
            }
            fn read_dashboard_link(
                &mut self,
            ) -> impl Future<Output = Result<DashboardLink, SessionError>> + Send {
                async { Ok(DashboardLink::new("")) }
            }
            fn clear_all_selections(
                &mut self,
            ) -> impl Future<Output = Result<(), SessionError>> + Send {
                async { Ok(()) }
            }
            fn refresh(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
                async { Ok(()) }
            }
            fn close(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
                async { Ok(()) }
            }
        }

        let result = try_match(&mut FailingSession, &item()).await;
        assert!(matches!(result, Err(SessionError::Navigation(_))));
    }
}
