//! Interactive respondent routes
//!
//! The messaging front end calls these on each respondent action: submit an
//! answer, then render whatever `next_question` says.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use svy_common::{Answer, RespondentId, SurveyEvent, Tally, VoteOutcome};
use tracing::debug;

use super::ApiError;
use crate::AppState;

/// Question text as presented to respondents
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub count: usize,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    pub index: usize,
    pub text: String,
    pub tally: Tally,
}

#[derive(Debug, Serialize)]
pub struct RespondentResponse {
    pub identity: RespondentId,
    pub privileged: bool,
    pub answered: Vec<usize>,
    pub next_question: Option<QuestionView>,
    pub completion_percent: f64,
    pub complete: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub identity: RespondentId,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Signed so that negative indices from malformed callbacks are
    /// reported as invalid rather than failing to parse
    pub question: i64,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub outcome: VoteOutcome,
    pub question: i64,
    /// Current tally of the submitted question, when it exists
    pub tally: Option<Tally>,
    pub next_question: Option<QuestionView>,
    pub completion_percent: f64,
    pub complete: bool,
}

/// Completion rounded to one decimal for display
fn display_percent(raw: f64) -> f64 {
    (raw * 10.0).round() / 10.0
}

fn next_question_view(state: &AppState, identity: &RespondentId) -> Option<QuestionView> {
    let index = state.progress.next_question(identity)?;
    let text = state.ledger.catalog().text_at(index).ok()?;
    Some(QuestionView {
        index,
        text: text.to_string(),
    })
}

/// GET /api/questions
pub async fn list_questions(State(state): State<AppState>) -> Json<QuestionsResponse> {
    let catalog = state.ledger.catalog();
    Json(QuestionsResponse {
        count: catalog.question_count(),
        questions: catalog
            .questions()
            .iter()
            .map(|q| QuestionView {
                index: q.index,
                text: q.text.clone(),
            })
            .collect(),
    })
}

/// GET /api/questions/:index
///
/// Question text with its current tally; 404 outside the catalog.
pub async fn get_question(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<QuestionDetail>, ApiError> {
    let text = state.ledger.catalog().text_at(index)?.to_string();
    let tally = state.ledger.tally(index)?;
    Ok(Json(QuestionDetail { index, text, tally }))
}

/// GET /api/respondents/:identity
pub async fn get_respondent(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Json<RespondentResponse> {
    let identity = RespondentId::from(identity);
    Json(RespondentResponse {
        privileged: state.progress.is_privileged(&identity),
        answered: state.ledger.progress_of(&identity).into_iter().collect(),
        next_question: next_question_view(&state, &identity),
        completion_percent: display_percent(state.progress.completion_percent(&identity)),
        complete: state.progress.is_complete(&identity),
        identity,
    })
}

/// POST /api/answers
///
/// Always 200: rejections are reported in `outcome`.
pub async fn submit_answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Json<AnswerResponse> {
    let index = usize::try_from(req.question).ok();
    let outcome = match index {
        Some(question) => state.ledger.record_vote_as(
            &req.identity,
            req.display_name.as_deref(),
            question,
            &req.answer,
        ),
        None if state.progress.is_privileged(&req.identity) => VoteOutcome::RejectedPrivileged,
        None => VoteOutcome::RejectedInvalidIndex,
    };
    let tally = index.and_then(|q| state.ledger.tally(q).ok());

    match (outcome, index, tally, req.answer.parse::<Answer>()) {
        (VoteOutcome::Accepted, Some(question), Some(tally), Ok(answer)) => {
            state.events.emit_lossy(SurveyEvent::VoteRecorded {
                identity: req.identity.clone(),
                question,
                answer,
                tally,
                timestamp: Utc::now(),
            });
        }
        _ => debug!(
            "Vote from {} on question {} not recorded: {}",
            req.identity, req.question, outcome
        ),
    }

    Json(AnswerResponse {
        outcome,
        question: req.question,
        tally,
        next_question: next_question_view(&state, &req.identity),
        completion_percent: display_percent(state.progress.completion_percent(&req.identity)),
        complete: state.progress.is_complete(&req.identity),
    })
}
