//! WebSocket message types for UI clients and the agent

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::router::EventFrame;
use crate::view::ViewSnapshot;

/// View updates broadcast to UI clients
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    /// Full render state after a change
    Snapshot { payload: ViewSnapshot },

    /// Re-fit the viewport to the visible nodes
    FitView,

    /// A `from_social` import finished
    UrlProcessed { payload: Value },

    /// Agent connectivity changed
    Connectivity { agent_connected: bool, agents: usize },
}

/// WebSocket message wrapper with metadata
#[derive(Clone, Debug, Serialize)]
pub struct WsMessage {
    /// The view event
    #[serde(flatten)]
    pub event: ViewEvent,

    /// Monotonically increasing sequence ID for gap detection
    pub sequence_id: u64,

    /// Unix timestamp when the message was created
    pub timestamp: i64,
}

/// Messages sent by UI clients
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Switch the active session selector (`null`, `"all_sessions"` or an id)
    SetCurrentSession {
        #[serde(default)]
        session_id: Option<String>,
    },

    /// Begin a new run from an uploaded image (data URL)
    StartSession { img_b64: String },

    /// Begin a new run from an external content URL
    FromSocial { url: String },

    /// Ping for heartbeat
    Ping,
}

/// Commands relayed from UI clients to the agent
#[derive(Clone, Debug, PartialEq)]
pub enum AgentCommand {
    StartSession { img_b64: String },
    FromSocial { url: String },
}

impl AgentCommand {
    /// Frame in the same shape the agent uses for its own events
    pub fn to_frame(&self) -> EventFrame {
        match self {
            AgentCommand::StartSession { img_b64 } => {
                EventFrame::new("start_session", vec![json!({ "img_b64": img_b64 })])
            }
            AgentCommand::FromSocial { url } => {
                EventFrame::new("from_social", vec![json!({ "url": url })])
            }
        }
    }
}

/// Welcome message sent on connection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub current_sequence_id: u64,
    pub agent_connected: bool,
}

impl WelcomeMessage {
    pub fn new(current_sequence_id: u64, agent_connected: bool) -> Self {
        Self {
            msg_type: "connected".to_string(),
            current_sequence_id,
            agent_connected,
        }
    }
}

/// Pong response message
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PongMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
}

impl Default for PongMessage {
    fn default() -> Self {
        Self {
            msg_type: "pong".to_string(),
        }
    }
}

/// Error reported to a single UI client
#[derive(Clone, Debug, Serialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub code: String,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            msg_type: "error".to_string(),
            code: code.into(),
            message: message.into(),
        }
    }
}
