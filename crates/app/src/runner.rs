//! Batch runner — drives one session through one batch of items.
//!
//! Items are processed strictly in batch order. Unmatchable items (no away
//! label) are skipped without touching the session; matchable items go
//! through the fallback matcher and the search field is cleared after each
//! attempt. Every 50 processed items the current selection set is committed
//! to a dashboard, and a trailing partial group always gets a dashboard of
//! its own. The session is closed on every path.

use tracing::{debug, info, warn};
use traderdash_domain::batch::{BATCH_CAPACITY, Batch};
use traderdash_domain::error::SessionError;
use traderdash_domain::outcome::{BatchOutcome, DashboardLink};

use crate::matcher;
use crate::ports::AutomationSession;

/// Process `batch` on `session` and return its outcome.
///
/// The session is closed regardless of how processing ends; a failure to
/// close after successful processing is logged, not propagated.
///
/// # Errors
///
/// Propagates session-level failures only. Soft misses end up in the
/// outcome's skip list.
pub async fn run_batch<S: AutomationSession>(
    mut session: S,
    batch: &Batch,
) -> Result<BatchOutcome, SessionError> {
    let result = drive(&mut session, batch).await;
    if let Err(err) = session.close().await {
        warn!(owner = %batch.owner, error = %err, "failed to close session");
    }
    result
}

async fn drive<S: AutomationSession>(
    session: &mut S,
    batch: &Batch,
) -> Result<BatchOutcome, SessionError> {
    let mut links = Vec::new();
    let mut skipped = Vec::new();
    // Items attempted since the last dashboard was produced.
    let mut pending = 0usize;

    for item in &batch.items {
        if !item.is_matchable() {
            debug!(owner = %batch.owner, item = %item.name, "no away label, skipping");
            skipped.push(item.name.clone());
            continue;
        }

        if !matcher::try_match(session, item).await? {
            skipped.push(item.name.clone());
        }
        pending += 1;

        // Leave the search field empty for the next item.
        session.set_search_text("").await?;

        if pending == BATCH_CAPACITY {
            produce_dashboard(session, &mut links).await?;
            pending = 0;
        }
    }

    if pending > 0 {
        produce_dashboard(session, &mut links).await?;
    }

    info!(
        owner = %batch.owner,
        items = batch.len(),
        dashboards = links.len(),
        skipped = skipped.len(),
        "batch complete"
    );

    Ok(BatchOutcome {
        owner: batch.owner.clone(),
        item_count: batch.len(),
        links,
        skipped,
    })
}

/// Commit the current selection set: reload to a clean page, read the
/// dashboard link, then deselect everything for the next group.
async fn produce_dashboard<S: AutomationSession>(
    session: &mut S,
    links: &mut Vec<DashboardLink>,
) -> Result<(), SessionError> {
    session.refresh().await?;
    let link = session.read_dashboard_link().await?;
    links.push(link);
    session.clear_all_selections().await
}
