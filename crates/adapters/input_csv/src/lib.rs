//! # traderdash-adapter-input-csv
//!
//! Workload source reading the trading desk's CSV export. All input
//! normalization lives here so the core only ever sees clean, ordered,
//! grouped work items:
//!
//! 1. keep rows whose scheduled time-of-day falls within 04:00–22:29
//!    inclusive;
//! 2. drop rows with an empty event name;
//! 3. drop rows not scheduled for in-play, then dedup by event name
//!    keeping the highest in-play value;
//! 4. derive home/away labels and the pipe-formatted search name;
//! 5. normalize owner names (`-` → `Unassigned`, digits and parenthetical
//!    suffixes stripped);
//! 6. sort by owner and scheduled time, then group by owner.
//!
//! ## Dependency rule
//!
//! Depends on `traderdash-app` (port traits) and `traderdash-domain` only.

use std::future::Future;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{NaiveDateTime, NaiveTime};
use regex::Regex;
use tracing::debug;

use traderdash_app::ports::{OwnerWorkload, WorkloadSource};
use traderdash_domain::error::RunError;
use traderdash_domain::owner::OwnerName;
use traderdash_domain::work_item::WorkItem;

const COL_DATE: &str = "Date";
const COL_EVENT: &str = "Event";
const COL_TRADER: &str = "Assign a trader";
const COL_IN_PLAY: &str = "Scheduled for in-play";

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Errors raised while reading and normalizing the export.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The file could not be opened or read.
    #[error("failed to read input file")]
    Io(#[from] std::io::Error),
    /// A row could not be parsed as CSV.
    #[error("failed to parse csv")]
    Csv(#[from] csv::Error),
    /// A required column is absent from the header row.
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    /// A date cell did not match the export's `dd/mm/yyyy hh:mm` format.
    #[error("bad date `{value}` in row {row}")]
    BadDate {
        /// The offending cell contents.
        value: String,
        /// 1-based data row number.
        row: usize,
        /// Underlying parse failure.
        #[source]
        source: chrono::ParseError,
    },
}

/// [`WorkloadSource`] reading one CSV export file.
pub struct CsvWorkloadSource {
    path: PathBuf,
}

impl CsvWorkloadSource {
    /// Create a source for the export at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and normalize the file synchronously.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] for IO, CSV, header, or date problems.
    pub fn load_sync(&self) -> Result<Vec<OwnerWorkload>, InputError> {
        load_path(&self.path)
    }
}

impl WorkloadSource for CsvWorkloadSource {
    fn load(&self) -> impl Future<Output = Result<Vec<OwnerWorkload>, RunError>> + Send {
        // File IO stays off the runtime threads.
        let path = self.path.clone();
        async move {
            tokio::task::spawn_blocking(move || load_path(&path))
                .await
                .map_err(|err| RunError::Input(err.to_string()))?
                .map_err(|err| RunError::Input(err.to_string()))
        }
    }
}

/// Read and normalize an export from `path`.
///
/// # Errors
///
/// Returns an [`InputError`] for IO, CSV, header, or date problems.
pub fn load_path(path: &Path) -> Result<Vec<OwnerWorkload>, InputError> {
    let file = std::fs::File::open(path)?;
    load_reader(file)
}

struct Row {
    date: NaiveDateTime,
    event: String,
    owner: String,
    in_play: String,
}

/// Read and normalize an export from any reader.
///
/// # Errors
///
/// Returns an [`InputError`] for CSV, header, or date problems.
pub fn load_reader<R: Read>(reader: R) -> Result<Vec<OwnerWorkload>, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &'static str| -> Result<usize, InputError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(InputError::MissingColumn(name))
    };
    let date_col = column(COL_DATE)?;
    let event_col = column(COL_EVENT)?;
    let trader_col = column(COL_TRADER)?;
    let in_play_col = column(COL_IN_PLAY)?;

    let window_start = NaiveTime::from_hms_opt(4, 0, 0).unwrap_or_default();
    let window_end = NaiveTime::from_hms_opt(22, 29, 0).unwrap_or_default();

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let cell = |col: usize| record.get(col).unwrap_or("").to_string();

        let event = cell(event_col);
        if event.is_empty() {
            continue;
        }

        let raw_date = cell(date_col);
        let date = NaiveDateTime::parse_from_str(&raw_date, DATE_FORMAT).map_err(|source| {
            InputError::BadDate {
                value: raw_date.clone(),
                row: index + 1,
                source,
            }
        })?;
        let time = date.time();
        if time < window_start || time > window_end {
            continue;
        }

        let in_play = cell(in_play_col);
        if in_play == "No" {
            continue;
        }

        rows.push(Row {
            date,
            event,
            owner: cell(trader_col),
            in_play,
        });
    }

    let kept = dedup_by_event(rows);
    debug!(rows = kept.len(), "normalized csv rows");
    Ok(group_by_owner(kept))
}

/// Keep one row per event name, preferring the greatest in-play value.
fn dedup_by_event(mut rows: Vec<Row>) -> Vec<Row> {
    rows.sort_by(|a, b| b.in_play.cmp(&a.in_play));
    let mut seen = std::collections::HashSet::new();
    rows.retain(|row| seen.insert(row.event.clone()));
    rows
}

fn group_by_owner(rows: Vec<Row>) -> Vec<OwnerWorkload> {
    let mut entries: Vec<(OwnerName, NaiveDateTime, WorkItem)> = rows
        .into_iter()
        .map(|row| {
            let owner = normalize_owner(&row.owner);
            let item = to_work_item(&row.event);
            (owner, row.date, item)
        })
        .collect();
    entries.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));

    let mut groups: Vec<OwnerWorkload> = Vec::new();
    for (owner, _, item) in entries {
        match groups.last_mut() {
            Some(group) if group.owner == owner => group.items.push(item),
            _ => groups.push(OwnerWorkload::new(owner, vec![item])),
        }
    }
    groups
}

/// Normalize a raw owner cell: the placeholder dash becomes the sentinel,
/// digits and parenthetical suffixes are stripped, whitespace trimmed.
fn normalize_owner(raw: &str) -> OwnerName {
    if raw == "-" || raw.is_empty() {
        return OwnerName::unassigned();
    }
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    static PARENS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("valid digit pattern"));
    let parens = PARENS.get_or_init(|| Regex::new(r"\(.*\)").expect("valid paren pattern"));

    let cleaned = digits.replace_all(raw, "");
    let cleaned = parens.replace_all(&cleaned, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        OwnerName::unassigned()
    } else {
        OwnerName::new(cleaned)
    }
}

/// Derive the work item for an event name like `Arsenal v Spurs`:
/// pipe-formatted search name, home label, optional away label.
fn to_work_item(event: &str) -> WorkItem {
    let parts: Vec<&str> = event.split(" v ").map(str::trim).collect();
    let name = parts
        .iter()
        .map(|team| format!("|{team}|"))
        .collect::<Vec<_>>()
        .join(" |v| ");

    let home = (*parts.first().unwrap_or(&event)).to_string();
    match parts.get(1) {
        Some(away) => WorkItem::new(name, home, (*away).to_string()),
        None => WorkItem::without_away(name, home),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const HEADER: &str = "Date,Event,Assign a trader,Scheduled for in-play\n";

    fn load(body: &str) -> Vec<OwnerWorkload> {
        let data = format!("{HEADER}{body}");
        load_reader(data.as_bytes()).unwrap()
    }

    #[test]
    fn should_format_search_name_and_split_labels() {
        let groups = load("01/03/2025 12:00,Arsenal v Spurs,Smith,Yes\n");
        assert_eq!(groups.len(), 1);
        let item = &groups[0].items[0];
        assert_eq!(item.name, "|Arsenal| |v| |Spurs|");
        assert_eq!(item.home_label, "Arsenal");
        assert_eq!(item.away_label.as_deref(), Some("Spurs"));
    }

    #[test]
    fn should_mark_event_without_away_side_as_unmatchable() {
        let groups = load("01/03/2025 12:00,Arsenal,Smith,Yes\n");
        let item = &groups[0].items[0];
        assert_eq!(item.name, "|Arsenal|");
        assert!(item.away_label.is_none());
    }

    #[test]
    fn should_keep_only_rows_inside_the_daily_window() {
        let groups = load(concat!(
            "01/03/2025 03:59,Early v Bird,Smith,Yes\n",
            "01/03/2025 04:00,First v Keeper,Smith,Yes\n",
            "01/03/2025 22:29,Last v Keeper,Smith,Yes\n",
            "01/03/2025 22:30,Late v Night,Smith,Yes\n",
        ));
        let names: Vec<_> = groups[0].items.iter().map(|i| i.home_label.as_str()).collect();
        assert_eq!(names, vec!["First", "Last"]);
    }

    #[test]
    fn should_drop_rows_not_scheduled_for_in_play() {
        let groups = load(concat!(
            "01/03/2025 12:00,Arsenal v Spurs,Smith,No\n",
            "01/03/2025 13:00,Leeds v York,Smith,Yes\n",
        ));
        assert_eq!(groups[0].items.len(), 1);
        assert_eq!(groups[0].items[0].home_label, "Leeds");
    }

    #[test]
    fn should_dedup_repeated_events_keeping_one_row() {
        let groups = load(concat!(
            "01/03/2025 12:00,Arsenal v Spurs,Smith,Yes\n",
            "01/03/2025 14:00,Arsenal v Spurs,Smith,Yes\n",
        ));
        assert_eq!(groups[0].items.len(), 1);
    }

    #[test]
    fn should_skip_rows_with_empty_event() {
        let groups = load(concat!(
            "01/03/2025 12:00,,Smith,Yes\n",
            "01/03/2025 13:00,Leeds v York,Smith,Yes\n",
        ));
        assert_eq!(groups[0].items.len(), 1);
    }

    #[test]
    fn should_normalize_owner_names() {
        let groups = load(concat!(
            "01/03/2025 12:00,Arsenal v Spurs,-,Yes\n",
            "01/03/2025 13:00,Leeds v York,Smith2,Yes\n",
            "01/03/2025 14:00,Hull v Derby,Jones (backup),Yes\n",
        ));
        let mut owners: Vec<_> = groups.iter().map(|g| g.owner.as_str().to_string()).collect();
        owners.sort();
        assert_eq!(
            owners,
            vec![
                "Jones".to_string(),
                "Smith".to_string(),
                "Unassigned".to_string(),
            ]
        );
    }

    #[test]
    fn should_order_items_by_date_within_each_owner() {
        let groups = load(concat!(
            "01/03/2025 18:00,Leeds v York,Smith,Yes\n",
            "01/03/2025 09:00,Arsenal v Spurs,Smith,Yes\n",
        ));
        let names: Vec<_> = groups[0].items.iter().map(|i| i.home_label.as_str()).collect();
        assert_eq!(names, vec!["Arsenal", "Leeds"]);
    }

    #[test]
    fn should_fail_on_missing_required_column() {
        let data = "Date,Event,Scheduled for in-play\n01/03/2025 12:00,A v B,Yes\n";
        let err = load_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::MissingColumn(COL_TRADER)));
    }

    #[test]
    fn should_fail_on_unparseable_date() {
        let data = format!("{HEADER}2025-03-01,Arsenal v Spurs,Smith,Yes\n");
        let err = load_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::BadDate { row: 1, .. }));
    }

    #[test]
    fn should_load_from_a_file_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}01/03/2025 12:00,Arsenal v Spurs,Smith,Yes\n").unwrap();

        let source = CsvWorkloadSource::new(file.path());
        let groups = source.load_sync().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].owner.as_str(), "Smith");
    }

    #[tokio::test]
    async fn should_load_groups_through_the_port_off_the_runtime() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}01/03/2025 12:00,Arsenal v Spurs,Smith,Yes\n").unwrap();

        let source = CsvWorkloadSource::new(file.path());
        let groups = source.load().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].owner.as_str(), "Smith");
        assert_eq!(groups[0].items[0].name, "|Arsenal| |v| |Spurs|");
    }

    #[tokio::test]
    async fn should_surface_io_failure_through_the_port() {
        let source = CsvWorkloadSource::new("/nonexistent/events.csv");
        let result = source.load().await;
        assert!(matches!(result, Err(RunError::Input(_))));
    }
}
