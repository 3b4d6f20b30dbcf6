//! # Survey Common Library
//!
//! Progress and aggregation engine shared by the survey services:
//! - Question catalog (fixed, ordered yes/no questions)
//! - Ledger of per-respondent answers and per-question tallies
//! - Progress rules (next question, completion)
//! - Snapshot export (tabular rows and report summary)
//! - Admin gate over the privileged identity set
//! - Survey events and configuration loading

pub mod admin;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod ledger;
pub mod model;
pub mod progress;

pub use admin::AdminGate;
pub use catalog::QuestionCatalog;
pub use error::{Error, Result};
pub use events::{EventBus, SurveyEvent};
pub use export::{ExportRow, QuestionRow, ReportSummary, RespondentRow, SnapshotExporter};
pub use ledger::{Ledger, LedgerSnapshot, RespondentSummary};
pub use model::{Answer, AnswerLogEntry, RespondentId, Tally, VoteOutcome};
pub use progress::ProgressEngine;
