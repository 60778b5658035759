mod health;
mod sessions;
mod tracking;
mod wordtest;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .nest("/api/sessions", sessions::router())
        .nest("/api/tracking", tracking::router())
        .nest("/api/wordtest", wordtest::router())
        .with_state(state)
}
