//! Graph Store - canonical node and edge collection
//!
//! The store owns every node and edge of the context tree. All mutations go
//! through a single lock so one mutation completes before the next begins.
//! Mutations never fail; they report a [`Mutation`] outcome instead.

mod crud;
mod query;

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use crate::layout::{Direction, LayoutEngine};
use crate::types::{ContextPatch, Edge, GraphSnapshot, Node, SessionSelector};
use crate::error::GraphResult;

/// Result of applying one store mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The store changed
    Applied,
    /// A node with this id (or this edge) already exists
    Duplicate,
    /// The parent of a child node is not in the store
    UnknownParent,
    /// The target node is not in the store
    UnknownNode,
    /// The update carried nothing to apply
    Unchanged,
}

impl Mutation {
    pub fn is_applied(self) -> bool {
        self == Mutation::Applied
    }
}

/// Lock-protected graph contents
#[derive(Debug, Default)]
pub(crate) struct GraphState {
    pub(crate) nodes: Vec<Node>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) edge_ids: HashSet<String>,
    pub(crate) selector: SessionSelector,
    pub(crate) revision: u64,
}

impl GraphState {
    pub(crate) fn position_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = self.position_of(id)?;
        self.nodes.get_mut(idx)
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    pub(crate) fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        self.edge_ids = self.edges.iter().map(|e| e.id.clone()).collect();
    }

    pub(crate) fn bump(&mut self) {
        self.revision += 1;
    }
}

/// In-memory context graph shared by the router, the layout scheduler and
/// the presentation layer
pub struct GraphStore {
    pub(crate) state: Mutex<GraphState>,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GraphState::default()),
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

// Mutations (from crud.rs)
impl GraphStore {
    pub fn create_root_node(&self, node: Node) -> Mutation {
        crud::create_root_node(self, node)
    }

    pub fn create_child_node(&self, node: Node, parent_id: &str) -> Mutation {
        crud::create_child_node(self, node, parent_id)
    }

    pub fn update_context_data(&self, node_id: &str, patch: ContextPatch) -> Mutation {
        crud::update_context_data(self, node_id, patch)
    }

    pub fn set_session_id(&self, node_id: &str, session_id: Option<String>) -> GraphResult<Mutation> {
        crud::set_session_id(self, node_id, session_id)
    }

    pub fn set_nodes(&self, nodes: Vec<Node>) {
        crud::set_nodes(self, nodes)
    }

    pub fn set_edges(&self, edges: Vec<Edge>) {
        crud::set_edges(self, edges)
    }

    pub fn set_current_session(&self, selector: SessionSelector) {
        crud::set_current_session(self, selector)
    }

    pub fn apply_layout(&self, engine: &dyn LayoutEngine, direction: Direction) -> usize {
        crud::apply_layout(self, engine, direction)
    }

    pub fn clear_all(&self) {
        crud::clear_all(self)
    }
}

// Queries (from query.rs)
impl GraphStore {
    pub fn get_node_by_id(&self, node_id: &str) -> Option<Node> {
        query::get_node_by_id(self, node_id)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        query::snapshot(self)
    }

    pub fn nodes(&self) -> Vec<Node> {
        query::nodes(self)
    }

    pub fn edges(&self) -> Vec<Edge> {
        query::edges(self)
    }

    pub fn node_count(&self) -> usize {
        query::node_count(self)
    }

    pub fn edge_count(&self) -> usize {
        query::edge_count(self)
    }

    pub fn current_session(&self) -> SessionSelector {
        query::current_session(self)
    }

    pub fn revision(&self) -> u64 {
        query::revision(self)
    }
}
