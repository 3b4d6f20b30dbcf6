//! HTTP API handlers for svy-sr

pub mod admin;
pub mod error;
pub mod health;
pub mod respondents;
pub mod sse;
pub mod status;

pub use admin::{admin_middleware, export_csv, get_report, get_snapshot, reset_ledger, AdminIdentity};
pub use error::ApiError;
pub use health::health_routes;
pub use respondents::{get_question, get_respondent, list_questions, submit_answer};
pub use sse::event_stream;
pub use status::{get_status, get_status_rows};
