//! Interaction batch ingestion.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::models::{SessionId, TrackMode, UnitId};
use crate::response::AppError;
use crate::services::ingest::{self, IngestError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/traces", post(traces))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TraceBatchRequest {
    session_id: SessionId,
    /// May repeat; duplicates accumulate.
    unit_ids: Vec<UnitId>,
    mode: TrackMode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TraceBatchResponse {
    success: bool,
    applied: usize,
    skipped_unit_ids: Vec<UnitId>,
}

async fn traces(
    State(state): State<AppState>,
    Json(batch): Json<TraceBatchRequest>,
) -> Response {
    if batch.unit_ids.is_empty() {
        return AppError::bad_request("empty batch: unitIds required").into_response();
    }

    match ingest::ingest(state.store(), batch.session_id, &batch.unit_ids, batch.mode).await {
        Ok(report) => Json(TraceBatchResponse {
            success: true,
            applied: report.applied,
            skipped_unit_ids: report.skipped_unit_ids,
        })
        .into_response(),
        Err(err @ IngestError::SessionNotFound(_)) => {
            AppError::not_found(err.to_string()).into_response()
        }
    }
}
