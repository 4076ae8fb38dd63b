//! # Reporter Module
//!
//! What happened to every photo in a run.
//!
//! A run produces one [`ReportEntry`] per candidate and a set of
//! [`RunStats`] counters. At the end they are written to the destination
//! root as `reporte_organizacion.json` (machine-readable) and
//! `RESUMEN_ORGANIZACION.txt` (for people).

mod export;

pub use export::{write_json, write_reports, write_summary, ReportPaths, JSON_REPORT_FILE, SUMMARY_FILE};

use crate::core::metadata::CaptureDate;
use crate::core::router::{ReviewCategory, RoutingDecision};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Final action recorded for a photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportAction {
    Delete,
    Review,
    Keep,
    /// The file could not be read, so no decision was made
    Error,
}

impl ReportAction {
    pub fn label(&self) -> &'static str {
        match self {
            ReportAction::Delete => "DELETE",
            ReportAction::Review => "REVIEW",
            ReportAction::Keep => "KEEP",
            ReportAction::Error => "ERROR",
        }
    }
}

impl From<&RoutingDecision> for ReportAction {
    fn from(decision: &RoutingDecision) -> Self {
        match decision {
            RoutingDecision::Delete { .. } => ReportAction::Delete,
            RoutingDecision::Review { .. } => ReportAction::Review,
            RoutingDecision::Keep { .. } => ReportAction::Keep,
        }
    }
}

impl std::fmt::Display for ReportAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the run log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub file_name: String,
    pub source_path: PathBuf,
    pub action: ReportAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_date: Option<NaiveDate>,
}

impl ReportEntry {
    /// Entry for a routed photo. `Keep` carries no reason, only a date.
    pub fn routed(
        source_path: PathBuf,
        decision: &RoutingDecision,
        destination_path: Option<PathBuf>,
        date: &CaptureDate,
    ) -> Self {
        let reason = match decision {
            RoutingDecision::Keep { .. } => None,
            other => Some(other.describe()),
        };

        Self {
            file_name: file_name_of(&source_path),
            source_path,
            action: ReportAction::from(decision),
            destination_path,
            reason,
            captured_date: date.timestamp.map(|ts| ts.date()),
        }
    }

    /// Entry for a file that could not be read
    pub fn failed(source_path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            file_name: file_name_of(&source_path),
            source_path,
            action: ReportAction::Error,
            destination_path: None,
            reason: Some(message.into()),
            captured_date: None,
        }
    }
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Aggregate counters for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub total_processed: usize,
    pub moved_final: usize,
    pub exact_duplicates: usize,
    pub near_duplicates: usize,
    pub missing_date: usize,
    pub low_quality: usize,
    pub errors: usize,
}

impl RunStats {
    /// Count a decision. Errors are counted separately.
    pub fn record(&mut self, decision: &RoutingDecision) {
        self.total_processed += 1;
        match decision {
            RoutingDecision::Delete { .. } => self.exact_duplicates += 1,
            RoutingDecision::Review { category, .. } => match category {
                ReviewCategory::DuplicateToConfirm => self.near_duplicates += 1,
                ReviewCategory::NoDate => self.missing_date += 1,
                ReviewCategory::LowQuality => self.low_quality += 1,
            },
            RoutingDecision::Keep { .. } => self.moved_final += 1,
        }
    }

    /// A file that could not be read at all
    pub fn record_unreadable(&mut self) {
        self.total_processed += 1;
        self.errors += 1;
    }

    /// A routed photo whose copy failed
    pub fn record_copy_failure(&mut self) {
        self.errors += 1;
    }

    pub fn pending_review(&self) -> usize {
        self.near_duplicates + self.missing_date + self.low_quality
    }

    /// Counters in display order
    pub fn entries(&self) -> [(&'static str, usize); 7] {
        [
            ("total_processed", self.total_processed),
            ("moved_final", self.moved_final),
            ("exact_duplicates", self.exact_duplicates),
            ("near_duplicates", self.near_duplicates),
            ("missing_date", self.missing_date),
            ("low_quality", self.low_quality),
            ("errors", self.errors),
        ]
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Local>,
    pub processed_at: DateTime<Local>,
    pub stats: RunStats,
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    pub fn entries_with(&self, action: ReportAction) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |e| e.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;

    #[test]
    fn stats_count_each_decision_once() {
        let mut stats = RunStats::default();
        stats.record(&RoutingDecision::Keep { year: 2022, month: 3 });
        stats.record(&RoutingDecision::exact_duplicate(Path::new("a.jpg")));
        stats.record(&RoutingDecision::review(ReviewCategory::NoDate, "missing date metadata"));
        stats.record(&RoutingDecision::review(ReviewCategory::LowQuality, "unreadable"));
        stats.record_unreadable();

        assert_eq!(stats.total_processed, 5);
        assert_eq!(stats.moved_final, 1);
        assert_eq!(stats.exact_duplicates, 1);
        assert_eq!(stats.missing_date, 1);
        assert_eq!(stats.low_quality, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.pending_review(), 2);
    }

    #[test]
    fn copy_failure_does_not_recount_the_photo() {
        let mut stats = RunStats::default();
        stats.record(&RoutingDecision::Keep { year: 2022, month: 3 });
        stats.record_copy_failure();

        assert_eq!(stats.total_processed, 1);
        assert_eq!(stats.moved_final, 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn keep_entry_has_date_and_no_reason() {
        let date = CaptureDate::from_file_system(
            NaiveDate::from_ymd_opt(2022, 3, 10)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
        );
        let entry = ReportEntry::routed(
            PathBuf::from("/src/a.jpg"),
            &RoutingDecision::Keep { year: 2022, month: 3 },
            Some(PathBuf::from("/lib/2022/03_Marzo/a.jpg")),
            &date,
        );

        assert_eq!(entry.file_name, "a.jpg");
        assert_eq!(entry.action, ReportAction::Keep);
        assert_eq!(entry.reason, None);
        assert_eq!(entry.captured_date, NaiveDate::from_ymd_opt(2022, 3, 10));
    }

    #[test]
    fn delete_entry_cites_original() {
        let entry = ReportEntry::routed(
            PathBuf::from("/src/a_copy.jpg"),
            &RoutingDecision::exact_duplicate(Path::new("/src/a.jpg")),
            None,
            &CaptureDate::unknown(),
        );

        assert_eq!(entry.action, ReportAction::Delete);
        assert_eq!(entry.reason.as_deref(), Some("exact duplicate of a.jpg"));
        assert_eq!(entry.destination_path, None);
    }

    #[test]
    fn entry_json_omits_missing_fields() {
        let entry = ReportEntry::failed(PathBuf::from("/src/locked.jpg"), "permission denied");
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"action\":\"Error\""));
        assert!(!json.contains("destination_path"));
        assert!(!json.contains("captured_date"));
    }
}
