//! WebSocket connection handler for UI clients

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::events::{AgentCommand, ClientMessage, ErrorMessage, PongMessage, WelcomeMessage};
use super::state::AppState;
use crate::router::RouterCommand;
use crate::types::SessionSelector;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => socket.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "failed to encode message");
            true
        }
    }
}

/// Handle an individual UI connection
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.subscribe();

    let welcome = WelcomeMessage::new(state.current_sequence_id(), state.is_agent_connected());
    if !send_json(&mut socket, &welcome).await {
        return; // Client disconnected immediately
    }
    if !send_json(&mut socket, &state.snapshot_message()).await {
        return;
    }
    debug!(clients = state.views.receiver_count(), "ui client connected");

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(msg) => {
                        if !send_json(&mut socket, &msg).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Too slow; skip ahead to the current state
                        debug!(missed = n, "ui client lagged, resyncing");
                        if !send_json(&mut socket, &state.snapshot_message()).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket, &state).await {
                            break;
                        }
                    }
                    Some(Err(_)) => break,
                    None => break,
                }
            }
        }
    }

    debug!("ui client disconnected");
}

/// Handle a message from the client
/// Returns false if the connection should be closed
async fn handle_client_message(msg: Message, socket: &mut WebSocket, state: &AppState) -> bool {
    match msg {
        Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(client_msg) => apply_client_message(client_msg, socket, state).await,
            Err(e) => {
                let error = ErrorMessage::new("invalid_message", e.to_string());
                send_json(socket, &error).await
            }
        },
        Message::Binary(_) => true,
        Message::Ping(data) => socket.send(Message::Pong(data)).await.is_ok(),
        Message::Pong(_) => true,
        Message::Close(_) => false,
    }
}

async fn apply_client_message(
    msg: ClientMessage,
    socket: &mut WebSocket,
    state: &AppState,
) -> bool {
    match msg {
        ClientMessage::Ping => send_json(socket, &PongMessage::default()).await,
        ClientMessage::SetCurrentSession { session_id } => {
            let selector = SessionSelector::from_wire(session_id.as_deref());
            state
                .submit(RouterCommand::SetCurrentSession(selector))
                .await;
            true
        }
        ClientMessage::StartSession { img_b64 } => {
            if state.config.clear_on_new_run {
                state.submit(RouterCommand::ClearAll).await;
            }
            relay(AgentCommand::StartSession { img_b64 }, socket, state).await
        }
        ClientMessage::FromSocial { url } => {
            relay(AgentCommand::FromSocial { url }, socket, state).await
        }
    }
}

async fn relay(command: AgentCommand, socket: &mut WebSocket, state: &AppState) -> bool {
    if state.send_to_agent(command) {
        return true;
    }
    let error = ErrorMessage::new("agent_offline", "no agent is connected");
    send_json(socket, &error).await
}
