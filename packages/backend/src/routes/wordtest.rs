//! Test composition and answer grading endpoints.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::models::{LearningUnit, SessionId, UnitId};
use crate::response::AppError;
use crate::services::composer::{self, ComposeError, Eligibility, DEFAULT_TEST_WORDS};
use crate::services::grader::{self, AnswerResult, GradeError, SubmittedAnswer};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/info", get(info))
        .route("/compose", post(compose))
        .route("/:session_id/answers", post(answers))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InfoQuery {
    user_id: String,
    language_key: String,
}

#[derive(Debug, Serialize)]
struct InfoResponse {
    success: bool,
    data: Eligibility,
}

async fn info(State(state): State<AppState>, Query(query): Query<InfoQuery>) -> Response {
    match composer::eligibility(state.store(), &query.user_id, &query.language_key).await {
        Ok(report) => Json(InfoResponse {
            success: true,
            data: report,
        })
        .into_response(),
        Err(err @ ComposeError::LanguageNotFound(_)) => {
            AppError::not_found(err.to_string()).into_response()
        }
        Err(err) => AppError::internal(err.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComposeRequest {
    user_id: String,
    language_key: String,
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComposeResponse {
    success: bool,
    data: ComposeOutcome,
}

/// Either a composed test or a progress report; insufficient candidates is
/// an expected outcome, not an error.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum ComposeOutcome {
    #[serde(rename_all = "camelCase")]
    Test {
        unit_ids: Vec<UnitId>,
        units: Vec<LearningUnit>,
    },
    #[serde(rename_all = "camelCase")]
    InsufficientCandidates {
        words_traced: usize,
        words_required: usize,
    },
}

async fn compose(
    State(state): State<AppState>,
    Json(request): Json<ComposeRequest>,
) -> Response {
    let count = request.count.unwrap_or(DEFAULT_TEST_WORDS);
    if count == 0 {
        return AppError::bad_request("count must be positive").into_response();
    }

    let outcome = composer::compose_test(
        state.store(),
        state.scorer(),
        &request.user_id,
        &request.language_key,
        count,
    )
    .await;

    match outcome {
        Ok(units) => Json(ComposeResponse {
            success: true,
            data: ComposeOutcome::Test {
                unit_ids: units.iter().map(|u| u.id).collect(),
                units,
            },
        })
        .into_response(),
        Err(ComposeError::InsufficientCandidates { have, need }) => Json(ComposeResponse {
            success: true,
            data: ComposeOutcome::InsufficientCandidates {
                words_traced: have,
                words_required: need,
            },
        })
        .into_response(),
        Err(err @ ComposeError::LanguageNotFound(_)) => {
            AppError::not_found(err.to_string()).into_response()
        }
        Err(ComposeError::Scorer(err)) => {
            AppError::out_of_vocabulary(err.to_string()).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnswerBatchRequest {
    answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerBatchResponse {
    success: bool,
    results: Vec<AnswerResult>,
    not_found_unit_ids: Vec<UnitId>,
}

async fn answers(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(batch): Json<AnswerBatchRequest>,
) -> Response {
    if batch.answers.is_empty() {
        return AppError::bad_request("no answers received").into_response();
    }

    match grader::grade_answers(state.store(), session_id, &batch.answers).await {
        Ok(report) => Json(AnswerBatchResponse {
            success: true,
            results: report.results,
            not_found_unit_ids: report.not_found_unit_ids,
        })
        .into_response(),
        Err(err @ GradeError::SessionNotFound(_)) => {
            AppError::not_found(err.to_string()).into_response()
        }
    }
}
