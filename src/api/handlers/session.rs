use crate::{research::SessionStats, AppState};
use axum::{extract::State, Json};

/// Counters accumulated by this server process
pub async fn get_session(State(state): State<AppState>) -> Json<SessionStats> {
    Json(state.session.read().clone())
}
