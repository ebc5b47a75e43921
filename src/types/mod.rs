//! Data types for the context graph
//!
//! This module contains the node, edge, payload and selector types shared by
//! the store, the router and the transport.

mod context;
mod edge;
mod graph;
mod node;
mod selector;

pub use context::{ContextData, ContextPatch, Message, NodeState, Role, Transition};
pub use edge::Edge;
pub use graph::GraphSnapshot;
pub use node::{Node, Position};
pub use selector::{validate_session_id, SessionSelector, ALL_SESSIONS};

/// Free-form key/value record used for session and global metadata
pub type InfoRecord = serde_json::Map<String, serde_json::Value>;
