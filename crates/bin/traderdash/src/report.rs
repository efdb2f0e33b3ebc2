//! Console reporting — a live progress bar while batches run, then the
//! per-owner dashboard summary.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use traderdash_app::ports::ReportSink;
use traderdash_domain::error::SessionError;
use traderdash_domain::outcome::OwnerReport;
use traderdash_domain::owner::OwnerName;
use traderdash_domain::progress::ProgressSnapshot;

/// Renders progress and results on stderr/stdout.
#[derive(Default)]
pub struct ConsoleReport {
    // Created lazily on the first snapshot so an empty run prints nothing.
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bar_for(&self, total: usize) -> ProgressBar {
        let mut guard = self
            .bar
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard
            .get_or_insert_with(|| {
                let bar = ProgressBar::new(total as u64);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{bar:40.cyan/blue} {pos}/{len} items ({elapsed})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            })
            .clone()
    }

    fn finish(&self) {
        let guard = self
            .bar
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(bar) = guard.as_ref() {
            bar.finish();
        }
    }
}

impl ReportSink for ConsoleReport {
    fn on_progress(&self, snapshot: ProgressSnapshot) {
        let bar = self.bar_for(snapshot.total);
        bar.set_position(snapshot.completed as u64);
    }

    fn on_batch_error(&self, owner: &OwnerName, error: &SessionError) {
        warn!(owner = %owner, error = %error, "batch failed");
        let message = format!("batch {owner} failed: {error}", owner = owner.as_str());
        let guard = self
            .bar
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match guard.as_ref() {
            // println through the bar keeps the bar line intact.
            Some(bar) => bar.println(&message),
            None => eprintln!("{message}"),
        }
    }

    fn on_run_complete(&self, reports: &[OwnerReport]) {
        self.finish();
        for report in reports {
            println!();
            println!("{}: {} games.", report.owner.as_str(), report.total_items);
            if !report.links.is_empty() {
                let rendered: Vec<String> = report
                    .links
                    .iter()
                    .map(|n| format!("{}) {}", n.number, n.link))
                    .collect();
                println!("Dashboards: {}", rendered.join(" "));
            }
            if !report.skipped.is_empty() {
                println!("Skipped ({}):", report.skipped.len());
                for name in &report.skipped {
                    println!("  {name}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Metadata};

    /// Subscriber that counts warning events and ignores everything else.
    struct WarnCounter {
        warnings: Arc<AtomicUsize>,
    }

    impl tracing::Subscriber for WarnCounter {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _attrs: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }
        fn record(&self, _id: &Id, _record: &Record<'_>) {}
        fn record_follows_from(&self, _id: &Id, _follows: &Id) {}
        fn event(&self, event: &Event<'_>) {
            if *event.metadata().level() == Level::WARN {
                self.warnings.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn enter(&self, _id: &Id) {}
        fn exit(&self, _id: &Id) {}
    }

    #[test]
    fn should_emit_warning_event_for_failed_batch() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = WarnCounter {
            warnings: Arc::clone(&warnings),
        };

        tracing::subscriber::with_default(subscriber, || {
            let report = ConsoleReport::new();
            report.on_batch_error(
                &OwnerName::new("Smith"),
                &SessionError::Navigation("lost connection".to_string()),
            );
        });

        assert_eq!(warnings.load(Ordering::SeqCst), 1);
    }
}
