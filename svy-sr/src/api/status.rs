//! Passive status routes
//!
//! Read-only aggregate views taken from one ledger snapshot per request.

use axum::{extract::State, Json};
use serde::Serialize;
use svy_common::{ExportRow, ReportSummary};
use uuid::Uuid;

use crate::AppState;

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<ReportSummary> {
    let snapshot = state.ledger.snapshot();
    Json(state.exporter.to_report_summary(&snapshot))
}

#[derive(Debug, Serialize)]
pub struct RowsResponse {
    pub epoch_id: Uuid,
    pub rows: Vec<ExportRow>,
}

/// GET /api/status/rows
pub async fn get_status_rows(State(state): State<AppState>) -> Json<RowsResponse> {
    let snapshot = state.ledger.snapshot();
    Json(RowsResponse {
        epoch_id: snapshot.epoch_id,
        rows: state.exporter.to_rows(&snapshot),
    })
}
