//! Read-only queries for the graph store

use crate::types::{Edge, GraphSnapshot, Node, SessionSelector};

use super::GraphStore;

pub fn get_node_by_id(store: &GraphStore, node_id: &str) -> Option<Node> {
    let state = store.state.lock();
    state
        .position_of(node_id)
        .and_then(|idx| state.nodes.get(idx).cloned())
}

/// Copy the full node and edge collections
pub fn snapshot(store: &GraphStore) -> GraphSnapshot {
    let state = store.state.lock();
    GraphSnapshot {
        nodes: state.nodes.clone(),
        edges: state.edges.clone(),
    }
}

pub fn nodes(store: &GraphStore) -> Vec<Node> {
    store.state.lock().nodes.clone()
}

pub fn edges(store: &GraphStore) -> Vec<Edge> {
    store.state.lock().edges.clone()
}

pub fn node_count(store: &GraphStore) -> usize {
    store.state.lock().nodes.len()
}

pub fn edge_count(store: &GraphStore) -> usize {
    store.state.lock().edges.len()
}

pub fn current_session(store: &GraphStore) -> SessionSelector {
    store.state.lock().selector.clone()
}

/// Monotonic counter of applied mutations
pub fn revision(store: &GraphStore) -> u64 {
    store.state.lock().revision
}
