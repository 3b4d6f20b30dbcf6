//! Administrative routes and the admin gate middleware
//!
//! Every route here runs behind [`admin_middleware`], which resolves the
//! caller from the `x-svy-identity` header and admits privileged identities only.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use svy_common::{LedgerSnapshot, ReportSummary, RespondentId, SurveyEvent};
use tracing::{info, warn};
use uuid::Uuid;

use super::ApiError;
use crate::{export, AppState, IDENTITY_HEADER};

/// Privileged caller, inserted as a request extension by the middleware
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub RespondentId);

/// Admin gate middleware
///
/// Returns 401 without an identity header and 403 for non-privileged identities.
pub async fn admin_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = request
        .headers()
        .get(IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(RespondentId::from)
        .ok_or(ApiError::MissingIdentity)?;

    if !state.ledger.gate().is_privileged(&identity) {
        warn!(
            "Rejected administrative request to {} from non-privileged identity {}",
            request.uri().path(),
            identity
        );
        return Err(ApiError::Forbidden(identity.to_string()));
    }

    request.extensions_mut().insert(AdminIdentity(identity));
    Ok(next.run(request).await)
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub status: String,
    pub epoch_id: Uuid,
}

/// POST /api/admin/reset
///
/// Discards all tallies and respondent progress.
pub async fn reset_ledger(
    State(state): State<AppState>,
    Extension(AdminIdentity(admin)): Extension<AdminIdentity>,
) -> Json<ResetResponse> {
    let epoch_id = state.ledger.reset();
    info!("Ledger reset requested by {} (epoch now {})", admin, epoch_id);

    state.events.emit_lossy(SurveyEvent::LedgerReset {
        epoch_id,
        requested_by: admin,
        timestamp: Utc::now(),
    });

    Json(ResetResponse {
        status: "reset".to_string(),
        epoch_id,
    })
}

/// GET /api/admin/export.csv
///
/// Question section followed by respondent section, from one snapshot.
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = state.ledger.snapshot();
    let rows = state.exporter.to_rows(&snapshot);
    let body = export::rows_to_csv(&rows).map_err(|e| ApiError::Internal(e.to_string()))?;

    let disposition = format!(
        "attachment; filename=\"survey-{}.csv\"",
        snapshot.taken_at.format("%Y%m%d-%H%M%S")
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// GET /api/admin/report
pub async fn get_report(State(state): State<AppState>) -> Json<ReportSummary> {
    let snapshot = state.ledger.snapshot();
    Json(state.exporter.to_report_summary(&snapshot))
}

/// GET /api/admin/snapshot
///
/// Raw snapshot including per-respondent completion.
pub async fn get_snapshot(State(state): State<AppState>) -> Json<LedgerSnapshot> {
    Json(state.ledger.snapshot())
}
