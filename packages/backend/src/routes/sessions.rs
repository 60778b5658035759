//! Session lifecycle endpoints, driven by the surrounding application.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::models::{LearningSession, SessionId, SessionType};
use crate::response::AppError;
use crate::state::AppState;
use crate::store::StoreError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start))
        .route("/:id/end", post(end))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartSessionRequest {
    user_id: String,
    language_key: String,
    session_type: SessionType,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    success: bool,
    data: LearningSession,
}

async fn start(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Response {
    if request.user_id.trim().is_empty() {
        return AppError::bad_request("userId required").into_response();
    }

    match state
        .store()
        .start_session(&request.user_id, &request.language_key, request.session_type)
        .await
    {
        Ok(session) => {
            tracing::info!(
                session_id = %session.id,
                user_id = %session.user_id,
                session_type = ?session.session_type,
                "session started"
            );
            Json(SessionResponse {
                success: true,
                data: session,
            })
            .into_response()
        }
        Err(err @ StoreError::LanguageNotFound(_)) => {
            AppError::not_found(err.to_string()).into_response()
        }
        Err(err) => AppError::internal(err.to_string()).into_response(),
    }
}

async fn end(State(state): State<AppState>, Path(id): Path<SessionId>) -> Response {
    match state.store().end_session(id).await {
        Ok(session) => Json(SessionResponse {
            success: true,
            data: session,
        })
        .into_response(),
        Err(err @ StoreError::SessionNotFound(_)) => {
            AppError::not_found(err.to_string()).into_response()
        }
        Err(err) => AppError::internal(err.to_string()).into_response(),
    }
}
