//! API module for HTTP and WebSocket endpoints
//!
//! The agent feeds events over `/ws/agent`; UI clients follow the view over
//! `/ws` and read snapshots over REST.

pub mod http;
pub mod rest;
pub mod websocket;

pub use http::create_router;
pub use websocket::AppState;
