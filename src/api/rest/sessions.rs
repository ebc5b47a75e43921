//! Session and global metadata endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{ApiError, ApiResponse};
use crate::api::websocket::state::AppState;

/// GET /api/sessions - All session records keyed by id
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sessions = state.sessions().all();
    let total = sessions.len();
    Json(ApiResponse::with_total(
        sessions,
        state.current_sequence_id(),
        total,
    ))
}

/// GET /api/sessions/:id - One session record
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.sessions().get(&id) {
        Some(info) => Json(ApiResponse::new(info, state.current_sequence_id())).into_response(),
        None => ApiError::not_found(format!("Session '{}' not found", id))
            .into_response_with(StatusCode::NOT_FOUND),
    }
}

/// GET /api/global - Global info record
pub async fn get_global(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::new(
        state.sessions().global_info(),
        state.current_sequence_id(),
    ))
}
