//! WebSocket endpoints
//!
//! - `/ws/agent`: event frames from the agent, UI commands back to it
//! - `/ws`: view updates to UI clients

pub mod agent;
pub mod broadcaster;
pub mod events;
pub mod handler;
pub mod state;

pub use broadcaster::ViewBroadcaster;
pub use events::{AgentCommand, ClientMessage, ViewEvent, WsMessage};
pub use state::AppState;
