//! Snapshot export
//!
//! Pure transformation of a [`LedgerSnapshot`] into tabular rows and a
//! report summary. Encoding to CSV, JSON or pages is left to callers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{LedgerSnapshot, QuestionCatalog, RespondentId};

/// Per-question line of an export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRow {
    pub question: usize,
    pub text: String,
    pub yes: u64,
    pub no: u64,
    pub total: u64,
    pub yes_percent: f64,
    pub no_percent: f64,
}

/// Per-respondent line of an export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RespondentRow {
    pub identity: RespondentId,
    pub display_name: String,
    pub answered_count: usize,
    pub completion_percent: f64,
    pub last_active: DateTime<Utc>,
}

/// One export row; questions come first in catalog order, then respondents
/// in order of first recorded vote
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportRow {
    Question(QuestionRow),
    Respondent(RespondentRow),
}

/// Aggregate figures plus per-question breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub epoch_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub total_participants: usize,
    pub total_votes: u64,
    /// Percent of known respondents who answered every question
    pub completion_rate: f64,
    pub per_question: Vec<QuestionRow>,
}

/// `part / whole` as an unrounded percentage; 0 when `whole` is 0
///
/// Rounding is left to whatever renders the figure.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

/// Stateless exporter bound to the question catalog
#[derive(Debug, Clone)]
pub struct SnapshotExporter {
    catalog: Arc<QuestionCatalog>,
}

impl SnapshotExporter {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self { catalog }
    }

    pub fn question_rows(&self, snapshot: &LedgerSnapshot) -> Vec<QuestionRow> {
        self.catalog
            .questions()
            .iter()
            .map(|q| {
                let tally = snapshot.tallies.get(q.index).copied().unwrap_or_default();
                let total = tally.total();
                QuestionRow {
                    question: q.index,
                    text: q.text.clone(),
                    yes: tally.yes,
                    no: tally.no,
                    total,
                    yes_percent: percent(tally.yes, total),
                    no_percent: percent(tally.no, total),
                }
            })
            .collect()
    }

    pub fn respondent_rows(&self, snapshot: &LedgerSnapshot) -> Vec<RespondentRow> {
        let n = self.catalog.question_count() as u64;
        snapshot
            .respondents
            .iter()
            .map(|r| RespondentRow {
                identity: r.identity.clone(),
                display_name: r.display_name.clone(),
                answered_count: r.answered_count,
                completion_percent: percent(r.answered_count as u64, n),
                last_active: r.last_active,
            })
            .collect()
    }

    pub fn to_rows(&self, snapshot: &LedgerSnapshot) -> Vec<ExportRow> {
        self.question_rows(snapshot)
            .into_iter()
            .map(ExportRow::Question)
            .chain(self.respondent_rows(snapshot).into_iter().map(ExportRow::Respondent))
            .collect()
    }

    pub fn to_report_summary(&self, snapshot: &LedgerSnapshot) -> ReportSummary {
        let n = self.catalog.question_count();
        let completed = snapshot
            .respondents
            .iter()
            .filter(|r| r.answered_count == n)
            .count();

        ReportSummary {
            epoch_id: snapshot.epoch_id,
            generated_at: snapshot.taken_at,
            total_participants: snapshot.respondent_count,
            total_votes: snapshot.total_votes,
            completion_rate: percent(completed as u64, snapshot.respondent_count as u64),
            per_question: self.question_rows(snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdminGate, Ledger};

    fn setup() -> (Ledger, SnapshotExporter) {
        let catalog = Arc::new(QuestionCatalog::new(["q0", "q1"]).unwrap());
        let ledger = Ledger::new(catalog.clone(), Arc::new(AdminGate::default()));
        (ledger, SnapshotExporter::new(catalog))
    }

    #[test]
    fn test_percent_guard_and_no_rounding() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(5, 0), 0.0);
        assert_eq!(percent(1, 3), 100.0 / 3.0);
        assert_eq!(percent(2, 3), 200.0 / 3.0);
        assert_eq!(percent(3, 3), 100.0);
    }

    #[test]
    fn test_empty_snapshot_rows() {
        let (ledger, exporter) = setup();
        let rows = exporter.to_rows(&ledger.snapshot());

        assert_eq!(rows.len(), 2);
        match &rows[1] {
            ExportRow::Question(row) => {
                assert_eq!(row.text, "q1");
                assert_eq!(row.total, 0);
                assert_eq!(row.yes_percent, 0.0);
                assert_eq!(row.no_percent, 0.0);
            }
            other => panic!("expected question row, got {:?}", other),
        }

        let summary = exporter.to_report_summary(&ledger.snapshot());
        assert_eq!(summary.total_participants, 0);
        assert_eq!(summary.completion_rate, 0.0);
    }

    #[test]
    fn test_rows_questions_then_respondents() {
        let (ledger, exporter) = setup();
        ledger.record_vote_as(&"bob".into(), Some("Bob"), 0, "no");
        ledger.record_vote(&"alice".into(), 0, "yes");
        ledger.record_vote(&"alice".into(), 1, "yes");

        let rows = exporter.to_rows(&ledger.snapshot());
        assert_eq!(rows.len(), 4);

        match &rows[0] {
            ExportRow::Question(row) => {
                assert_eq!((row.yes, row.no, row.total), (1, 1, 2));
                assert_eq!(row.yes_percent, 50.0);
            }
            other => panic!("expected question row, got {:?}", other),
        }
        match (&rows[2], &rows[3]) {
            (ExportRow::Respondent(first), ExportRow::Respondent(second)) => {
                assert_eq!(first.display_name, "Bob");
                assert_eq!(first.completion_percent, 50.0);
                assert_eq!(second.identity, RespondentId::from("alice"));
                assert_eq!(second.completion_percent, 100.0);
            }
            other => panic!("expected respondent rows, got {:?}", other),
        }
    }

    #[test]
    fn test_report_summary_completion_rate() {
        let (ledger, exporter) = setup();
        ledger.record_vote(&"alice".into(), 0, "yes");
        ledger.record_vote(&"alice".into(), 1, "no");
        ledger.record_vote(&"bob".into(), 1, "yes");
        ledger.record_vote(&"carol".into(), 0, "yes");

        let summary = exporter.to_report_summary(&ledger.snapshot());
        assert_eq!(summary.total_participants, 3);
        assert_eq!(summary.total_votes, 4);
        assert_eq!(summary.completion_rate, 100.0 / 3.0);
        assert_eq!(summary.per_question[1].yes, 1);
        assert_eq!(summary.per_question[1].no, 1);
    }
}
