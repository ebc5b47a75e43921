//! WebSocket connection handler for the agent
//!
//! Inbound text frames are parsed and queued to the router in arrival order.
//! Commands from UI clients flow back out on the same socket.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::state::AppState;
use crate::router::{EventFrame, RouterCommand};

/// WebSocket upgrade handler for the agent endpoint
pub async fn agent_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_agent_socket(socket, state))
}

async fn handle_agent_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut commands = state.agent_connected();

    loop {
        tokio::select! {
            result = commands.recv() => {
                match result {
                    Ok(command) => {
                        let frame = command.to_frame();
                        match serde_json::to_string(&frame) {
                            Ok(json) => {
                                if socket.send(Message::Text(json)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!(error = %e, "failed to encode agent command"),
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "agent command relay lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => match EventFrame::parse(&text) {
                        Ok(frame) => {
                            debug!(event = %frame.event, args = frame.args.len(), "agent event");
                            if !state.submit(RouterCommand::Event(frame)).await {
                                break;
                            }
                        }
                        Err(e) => warn!(error = %e, "malformed agent frame dropped"),
                    },
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                    None => break,
                }
            }
        }
    }

    state.agent_disconnected();
}
