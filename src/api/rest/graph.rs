//! Graph endpoints - view snapshot, counters, single node, clear

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::{ApiError, ApiResponse};
use crate::api::websocket::state::AppState;
use crate::router::RouterCommand;

/// GET /api/graph - Current view snapshot
///
/// Nodes are filtered by the active session selector; edges are not.
pub async fn get_graph(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot();
    let total = snapshot.nodes.len();
    Json(ApiResponse::with_total(
        snapshot,
        state.current_sequence_id(),
        total,
    ))
}

/// Response for GET /api/graph/stats
#[derive(Debug, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub visible_count: usize,
    pub session_count: usize,
    pub revision: u64,
    pub layout_passes: u64,
    pub agent_connected: bool,
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store();
    let stats = GraphStats {
        node_count: store.node_count(),
        edge_count: store.edge_count(),
        visible_count: crate::view::visible_nodes(store, state.sessions()).len(),
        session_count: state.sessions().session_ids().len(),
        revision: store.revision(),
        layout_passes: state.router.scheduler().passes(),
        agent_connected: state.is_agent_connected(),
    };
    Json(ApiResponse::new(stats, state.current_sequence_id()))
}

/// GET /api/nodes/:id - Get a single node regardless of the selector
pub async fn get_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store().get_node_by_id(&id) {
        Some(node) => Json(ApiResponse::new(node, state.current_sequence_id())).into_response(),
        None => ApiError::not_found(format!("Node '{}' not found", id))
            .into_response_with(StatusCode::NOT_FOUND),
    }
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub queued: bool,
}

/// DELETE /api/graph - Queue a clear behind any pending events
pub async fn clear_graph(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.submit(RouterCommand::ClearAll).await {
        (
            StatusCode::ACCEPTED,
            Json(ApiResponse::new(
                ClearResponse { queued: true },
                state.current_sequence_id(),
            )),
        )
            .into_response()
    } else {
        ApiError::unavailable("event router is not running")
            .into_response_with(StatusCode::SERVICE_UNAVAILABLE)
    }
}
