//! CSV encoding of export rows
//!
//! Two sections in one file: a question header and rows, then a respondent
//! header and rows. The writer is flexible because the sections differ in width.

use std::io;
use svy_common::{ExportRow, QuestionRow, RespondentRow};

const QUESTION_HEADER: [&str; 7] = [
    "question",
    "text",
    "yes",
    "no",
    "total",
    "yes_percent",
    "no_percent",
];

const RESPONDENT_HEADER: [&str; 5] = [
    "identity",
    "display_name",
    "answered_count",
    "completion_percent",
    "last_active",
];

fn question_record(row: &QuestionRow) -> [String; 7] {
    [
        (row.question + 1).to_string(),
        row.text.clone(),
        row.yes.to_string(),
        row.no.to_string(),
        row.total.to_string(),
        format!("{:.1}", row.yes_percent),
        format!("{:.1}", row.no_percent),
    ]
}

fn respondent_record(row: &RespondentRow) -> [String; 5] {
    [
        row.identity.to_string(),
        row.display_name.clone(),
        row.answered_count.to_string(),
        format!("{:.1}", row.completion_percent),
        row.last_active.to_rfc3339(),
    ]
}

/// Encode rows as CSV text
///
/// Question numbers are written 1-based.
pub fn rows_to_csv(rows: &[ExportRow]) -> csv::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(QUESTION_HEADER)?;
    for row in rows {
        if let ExportRow::Question(q) = row {
            writer.write_record(question_record(q))?;
        }
    }

    writer.write_record(RESPONDENT_HEADER)?;
    for row in rows {
        if let ExportRow::Respondent(r) = row {
            writer.write_record(respondent_record(r))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use svy_common::{AdminGate, Ledger, QuestionCatalog, SnapshotExporter};

    #[test]
    fn test_csv_sections_and_quoting() {
        let catalog = Arc::new(QuestionCatalog::new(["Plain?", "Has, comma?"]).unwrap());
        let ledger = Ledger::new(catalog.clone(), Arc::new(AdminGate::default()));
        ledger.record_vote_as(&"42".into(), Some("Ann \"A\""), 1, "yes");

        let rows = SnapshotExporter::new(catalog).to_rows(&ledger.snapshot());
        let csv = rows_to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "question,text,yes,no,total,yes_percent,no_percent");
        assert_eq!(lines[1], "1,Plain?,0,0,0,0.0,0.0");
        assert_eq!(lines[2], "2,\"Has, comma?\",1,0,1,100.0,0.0");
        assert_eq!(lines[3], "identity,display_name,answered_count,completion_percent,last_active");
        assert!(lines[4].starts_with("42,\"Ann \"\"A\"\"\",1,50.0,"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_csv_keeps_non_ascii_text_and_rounds_percent() {
        let catalog = Arc::new(QuestionCatalog::new(["Приоритет семьи?"]).unwrap());
        let ledger = Ledger::new(catalog.clone(), Arc::new(AdminGate::default()));
        ledger.record_vote_as(&"7".into(), Some("Ирина"), 0, "yes");
        ledger.record_vote(&"8".into(), 0, "no");
        ledger.record_vote(&"9".into(), 0, "no");

        let rows = SnapshotExporter::new(catalog).to_rows(&ledger.snapshot());
        let csv = rows_to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        // Raw 33.33.. / 66.66.. are rounded only here
        assert_eq!(lines[1], "1,Приоритет семьи?,1,2,3,33.3,66.7");
        assert!(lines[3].starts_with("7,Ирина,1,100.0,"));
    }

    #[test]
    fn test_csv_without_respondents() {
        let catalog = Arc::new(QuestionCatalog::new(["Only?"]).unwrap());
        let ledger = Ledger::new(catalog.clone(), Arc::new(AdminGate::default()));
        let rows = SnapshotExporter::new(catalog).to_rows(&ledger.snapshot());

        let csv = rows_to_csv(&rows).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }
}
