//! svy-sr library - Survey status & report service
//!
//! Hosts the survey ledger for the process lifetime and exposes it to the
//! three collaborators: interactive respondent handling, administrative
//! reset/export, and passive status reporting.

use axum::Router;
use std::sync::Arc;
use svy_common::events::EventBus;
use svy_common::{Ledger, ProgressEngine, SnapshotExporter};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod export;

/// Header carrying the caller identity on administrative requests
pub const IDENTITY_HEADER: &str = "x-svy-identity";

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Survey ledger (single shared mutable resource)
    pub ledger: Arc<Ledger>,
    pub progress: ProgressEngine,
    pub exporter: SnapshotExporter,
    /// Event fan-out for SSE subscribers
    pub events: EventBus,
    /// Whether aggregate status routes are served without an admin identity
    pub public_status: bool,
}

impl AppState {
    /// Create new application state around an existing ledger
    pub fn new(ledger: Arc<Ledger>, events: EventBus, public_status: bool) -> Self {
        Self {
            progress: ProgressEngine::new(ledger.clone()),
            exporter: SnapshotExporter::new(ledger.catalog().clone()),
            ledger,
            events,
            public_status,
        }
    }
}

/// Build application router
///
/// Administrative routes sit behind the admin gate middleware. Status routes
/// join them when `public_status` is off.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let status = Router::new()
        .route("/api/status", get(api::get_status))
        .route("/api/status/rows", get(api::get_status_rows))
        .route("/api/events", get(api::event_stream));

    let mut admin = Router::new()
        .route("/api/admin/reset", post(api::reset_ledger))
        .route("/api/admin/export.csv", get(api::export_csv))
        .route("/api/admin/report", get(api::get_report))
        .route("/api/admin/snapshot", get(api::get_snapshot));

    let mut public = Router::new()
        .route("/api/questions", get(api::list_questions))
        .route("/api/questions/:index", get(api::get_question))
        .route("/api/respondents/:identity", get(api::get_respondent))
        .route("/api/answers", post(api::submit_answer))
        .merge(api::health_routes());

    if state.public_status {
        public = public.merge(status);
    } else {
        admin = admin.merge(status);
    }

    let admin = admin.layer(middleware::from_fn_with_state(
        state.clone(),
        api::admin_middleware,
    ));

    Router::new()
        .merge(admin)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
