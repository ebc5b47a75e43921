//! Context Graph
//!
//! Incremental graph synchronization for visualizing an agent's context tree.
//! The agent streams events over a real-time channel; each event becomes one
//! mutation of an in-memory node/edge store, layout is recomputed after bursts
//! settle, and UI clients follow a session-filtered view of the result.
//!
//! # Modules
//!
//! - `types`: Nodes, edges, context payloads and the session selector
//! - `graph_store`: Node/edge store with idempotent creation and merge updates
//! - `session`: Per-session and global metadata records
//! - `router`: Event frames and the name-to-handler dispatch table
//! - `layout`: Layout engine trait, default layered layout, debounced scheduler
//! - `view`: Session-filtered read model
//! - `api`: Axum WebSocket and REST transport
//! - `config`, `logging`, `error`: Ambient setup
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use context_graph::{EventFrame, EventRouter, GraphStore, LayeredLayout, LayoutScheduler, SessionRegistry};
//! use context_graph::layout::Direction;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(GraphStore::new());
//! let scheduler = LayoutScheduler::new(store.clone(), Arc::new(LayeredLayout::default()), Direction::LR);
//! let router = EventRouter::new(store.clone(), Arc::new(SessionRegistry::new()), scheduler);
//!
//! router.dispatch(EventFrame::new("root_node", vec![json!("r1"), json!({})])).unwrap();
//! router.dispatch(EventFrame::new("add_node", vec![json!("r1"), json!("c1"), json!({})])).unwrap();
//! assert_eq!(store.edge_count(), 1);
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod graph_store;
pub mod layout;
pub mod logging;
pub mod router;
pub mod session;
pub mod types;
pub mod view;

// Re-export commonly used items at crate root
pub use config::ServerConfig;
pub use error::{GraphError, GraphResult, ServerResult};
pub use graph_store::{GraphStore, Mutation};
pub use layout::{LayeredLayout, LayoutEngine, LayoutScheduler};
pub use router::{EventFrame, EventRouter, RouterCommand, RouterNotice};
pub use session::SessionRegistry;
pub use types::{
    ContextData, ContextPatch, Edge, GraphSnapshot, Node, NodeState, Position, SessionSelector,
    Transition,
};
pub use view::ViewSnapshot;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
