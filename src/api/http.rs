//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{graph, sessions};
use super::websocket::{agent::agent_ws_handler, handler::ws_handler, state::AppState};

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // The presentation layer is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoints
        .route("/ws", get(ws_handler))
        .route("/ws/agent", get(agent_ws_handler))
        // Health check
        .route("/health", get(health_check))
        // REST API endpoints
        .route("/api/graph", get(graph::get_graph).delete(graph::clear_graph))
        .route("/api/graph/stats", get(graph::get_stats))
        .route("/api/nodes/:id", get(graph::get_node))
        .route("/api/sessions", get(sessions::list_sessions))
        .route("/api/sessions/:id", get(sessions::get_session))
        .route("/api/global", get(sessions::get_global))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::router::{EventFrame, RouterCommand};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::util::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn settle(state: &AppState, nodes: usize) {
        for _ in 0..100 {
            if state.store().node_count() == nodes {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("router never reached {} nodes", nodes);
    }

    #[tokio::test]
    async fn test_health_check() {
        let state = AppState::start(ServerConfig::default());
        let app = create_router(state);

        let response = get(app, "/health").await;

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_graph_and_node_endpoints() {
        let state = AppState::start(ServerConfig::default());
        state
            .submit(RouterCommand::Event(EventFrame::new(
                "root_node",
                vec![json!("r1"), json!({"observation": "start"})],
            )))
            .await;
        settle(&state, 1).await;
        let app = create_router(state);

        let response = get(app.clone(), "/api/graph").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"]["nodes"][0]["id"], "r1");

        let response = get(app.clone(), "/api/nodes/r1").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["isRoot"], true);
        assert_eq!(body["data"]["data"]["observation"], "start");

        let response = get(app, "/api/nodes/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_session_endpoints() {
        let state = AppState::start(ServerConfig::default());
        state
            .sessions()
            .set_key("s1", "completed", json!(false))
            .unwrap();
        let app = create_router(state);

        let body = body_json(get(app.clone(), "/api/sessions").await).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"]["s1"]["completed"], false);

        let response = get(app.clone(), "/api/sessions/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get(app, "/api/global").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_clear_graph() {
        let state = AppState::start(ServerConfig::default());
        state
            .submit(RouterCommand::Event(EventFrame::new(
                "root_node",
                vec![json!("r1"), json!({})],
            )))
            .await;
        settle(&state, 1).await;
        let app = create_router(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/api/graph")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        settle(&state, 0).await;
    }
}
