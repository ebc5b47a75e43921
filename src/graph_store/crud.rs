//! Mutations for the graph store

use tracing::debug;

use crate::error::GraphResult;
use crate::layout::{Direction, LayoutEngine};
use crate::types::{validate_session_id, ContextPatch, Edge, Node, SessionSelector};

use super::{GraphStore, Mutation};

/// Insert a root node unless a node with its id already exists
pub fn create_root_node(store: &GraphStore, mut node: Node) -> Mutation {
    let mut state = store.state.lock();
    if state.index.contains_key(&node.id) {
        debug!(node_id = %node.id, "root node already exists");
        return Mutation::Duplicate;
    }

    node.is_root = true;
    node.parent_id = None;
    state.push_node(node);
    state.bump();
    Mutation::Applied
}

/// Insert a child node and its parent edge (holds the lock for both)
///
/// The child always takes the parent's session id, whatever the payload says.
pub fn create_child_node(store: &GraphStore, mut node: Node, parent_id: &str) -> Mutation {
    let mut state = store.state.lock();
    let parent_session = match state.position_of(parent_id) {
        Some(idx) => state.nodes[idx].session_id.clone(),
        None => {
            debug!(node_id = %node.id, parent_id, "parent not found, dropping child");
            return Mutation::UnknownParent;
        }
    };

    let edge = Edge::between(parent_id, node.id.as_str());
    if state.index.contains_key(&node.id) || state.edge_ids.contains(&edge.id) {
        debug!(node_id = %node.id, "child node already exists");
        return Mutation::Duplicate;
    }

    node.is_root = false;
    node.parent_id = Some(parent_id.to_string());
    node.session_id = parent_session;
    state.push_node(node);
    state.edge_ids.insert(edge.id.clone());
    state.edges.push(edge);
    state.bump();
    Mutation::Applied
}

/// Shallow-merge a patch into an existing node's data
pub fn update_context_data(store: &GraphStore, node_id: &str, patch: ContextPatch) -> Mutation {
    let mut state = store.state.lock();
    match state.node_mut(node_id) {
        Some(_) if patch.is_empty() => {
            debug!(node_id, "empty update ignored");
            Mutation::Unchanged
        }
        Some(node) => {
            node.data.apply(patch);
            state.bump();
            Mutation::Applied
        }
        None => {
            debug!(node_id, "update for unknown node ignored");
            Mutation::UnknownNode
        }
    }
}

/// Overwrite one node's session id (late session assignment)
pub fn set_session_id(
    store: &GraphStore,
    node_id: &str,
    session_id: Option<String>,
) -> GraphResult<Mutation> {
    if let Some(id) = session_id.as_deref() {
        validate_session_id(id)?;
    }

    let mut state = store.state.lock();
    match state.node_mut(node_id) {
        Some(node) => {
            node.session_id = session_id;
            state.bump();
            Ok(Mutation::Applied)
        }
        None => {
            debug!(node_id, "session assignment for unknown node ignored");
            Ok(Mutation::UnknownNode)
        }
    }
}

/// Bulk replace the node collection
pub fn set_nodes(store: &GraphStore, nodes: Vec<Node>) {
    let mut state = store.state.lock();
    state.nodes = nodes;
    state.reindex();
    state.bump();
}

/// Bulk replace the edge collection
pub fn set_edges(store: &GraphStore, edges: Vec<Edge>) {
    let mut state = store.state.lock();
    state.edges = edges;
    state.reindex();
    state.bump();
}

pub fn set_current_session(store: &GraphStore, selector: SessionSelector) {
    let mut state = store.state.lock();
    state.selector = selector;
    state.bump();
}

/// Run the layout engine over the current graph and write back positions
///
/// Reads and writes under one lock, so the pass always sees the latest state
/// and only `position` is ever changed. Returns the number of nodes placed.
pub fn apply_layout(store: &GraphStore, engine: &dyn LayoutEngine, direction: Direction) -> usize {
    let mut state = store.state.lock();
    if state.nodes.is_empty() {
        return 0;
    }

    let laid_out = engine.layout(&state.nodes, &state.edges, direction);
    let mut placed = 0;
    for positioned in laid_out {
        if let Some(node) = state.node_mut(&positioned.id) {
            node.position = positioned.position;
            placed += 1;
        }
    }

    if placed > 0 {
        state.bump();
    }
    placed
}

/// Empty nodes and edges and reset the session selector
pub fn clear_all(store: &GraphStore) {
    let mut state = store.state.lock();
    state.nodes.clear();
    state.edges.clear();
    state.index.clear();
    state.edge_ids.clear();
    state.selector = SessionSelector::Unset;
    state.bump();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayeredLayout;
    use crate::types::{ContextData, NodeState, Position, Transition};
    use serde_json::json;

    fn node(id: &str) -> Node {
        Node::new(id, ContextData::default())
    }

    fn store_with_root(session: &str) -> GraphStore {
        let store = GraphStore::new();
        store.create_root_node(node("r1").with_session(session));
        store
    }

    #[test]
    fn test_create_root_node_idempotent() {
        let store = GraphStore::new();
        assert_eq!(store.create_root_node(node("r1")), Mutation::Applied);
        assert_eq!(store.create_root_node(node("r1")), Mutation::Duplicate);

        assert_eq!(store.node_count(), 1);
        let root = store.get_node_by_id("r1").unwrap();
        assert!(root.is_root);
        assert!(root.parent_id.is_none());
    }

    #[test]
    fn test_create_child_inherits_session() {
        let store = store_with_root("s1");
        let child = node("c1").with_session("other");

        assert_eq!(store.create_child_node(child, "r1"), Mutation::Applied);

        let child = store.get_node_by_id("c1").unwrap();
        assert_eq!(child.session_id.as_deref(), Some("s1"));
        assert_eq!(child.parent_id.as_deref(), Some("r1"));
        assert!(!child.is_root);

        let edges = store.edges();
        assert_eq!(edges, vec![Edge::between("r1", "c1")]);
    }

    #[test]
    fn test_create_child_duplicate_is_noop() {
        let store = store_with_root("s1");
        store.create_child_node(node("c1"), "r1");
        let revision = store.revision();

        assert_eq!(store.create_child_node(node("c1"), "r1"), Mutation::Duplicate);
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_create_child_unknown_parent_dropped() {
        let store = store_with_root("s1");
        assert_eq!(
            store.create_child_node(node("c1"), "missing-parent"),
            Mutation::UnknownParent
        );
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_update_merges_and_guards_nulls() {
        let store = GraphStore::new();
        let data = ContextData {
            observation: json!("before"),
            state: NodeState::Running,
            transition: Transition::Finish {
                return_values: json!({"output": "x"}),
            },
            ..Default::default()
        };
        store.create_root_node(Node::new("r1", data));

        let patch = ContextPatch::default().with_observation(json!("found"));
        assert_eq!(store.update_context_data("r1", patch), Mutation::Applied);

        let updated = store.get_node_by_id("r1").unwrap();
        assert_eq!(updated.data.observation, json!("found"));
        assert_eq!(updated.data.state, NodeState::Running);
        assert!(!updated.data.transition.is_none());

        assert_eq!(
            store.get_node_by_id("r1").unwrap().data.observation,
            json!("found")
        );
    }

    #[test]
    fn test_empty_update_is_unchanged() {
        let store = store_with_root("s1");
        let revision = store.revision();

        assert_eq!(
            store.update_context_data("r1", ContextPatch::default()),
            Mutation::Unchanged
        );
        assert_eq!(store.revision(), revision);
        assert_eq!(
            store.update_context_data("ghost", ContextPatch::default()),
            Mutation::UnknownNode
        );
    }

    #[test]
    fn test_update_unknown_node() {
        let store = GraphStore::new();
        assert_eq!(
            store.update_context_data("ghost", ContextPatch::default()),
            Mutation::UnknownNode
        );
    }

    #[test]
    fn test_set_session_id() {
        let store = store_with_root("s1");
        assert_eq!(
            store.set_session_id("r1", Some("s2".to_string())).unwrap(),
            Mutation::Applied
        );
        assert_eq!(
            store.get_node_by_id("r1").unwrap().session_id.as_deref(),
            Some("s2")
        );
        assert_eq!(
            store.set_session_id("ghost", Some("s2".to_string())).unwrap(),
            Mutation::UnknownNode
        );
        assert!(store
            .set_session_id("r1", Some("all_sessions".to_string()))
            .is_err());
    }

    #[test]
    fn test_set_nodes_replaces_and_reindexes() {
        let store = store_with_root("s1");
        let mut nodes = store.nodes();
        nodes[0].position = Position::new(5.0, 7.0);
        nodes.push(node("extra"));
        store.set_nodes(nodes);

        assert_eq!(store.node_count(), 2);
        assert_eq!(
            store.get_node_by_id("r1").unwrap().position,
            Position::new(5.0, 7.0)
        );
        assert!(store.get_node_by_id("extra").is_some());
    }

    #[test]
    fn test_apply_layout_only_moves_positions() {
        let store = GraphStore::new();
        let data = ContextData {
            observation: json!("seen"),
            state: NodeState::Reflecting,
            transition: Transition::Action {
                tool: "search".to_string(),
                tool_input: json!({"q": "cats"}),
            },
            auxiliary: json!({"score": 0.5}),
            ..Default::default()
        };
        store.create_root_node(Node::new("r1", data.clone()).with_session("s1"));
        store.create_child_node(Node::new("c1", data), "r1");
        let before = store.nodes();

        let placed = store.apply_layout(&LayeredLayout::new(100.0, 50.0), Direction::LR);

        assert_eq!(placed, 2);
        let after = store.nodes();
        assert_eq!(after.len(), before.len());
        for (old, new) in before.iter().zip(&after) {
            assert_eq!(
                Node {
                    position: old.position,
                    ..new.clone()
                },
                *old
            );
        }
        assert_eq!(after[1].position, Position::new(100.0, 0.0));
        assert_eq!(after[1].parent_id.as_deref(), Some("r1"));
        assert_eq!(after[1].session_id.as_deref(), Some("s1"));
        assert_eq!(store.edges(), vec![Edge::between("r1", "c1")]);
    }

    #[test]
    fn test_clear_all() {
        let store = store_with_root("s1");
        store.create_child_node(node("c1"), "r1");
        store.set_current_session(SessionSelector::AllSessions);

        store.clear_all();

        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.current_session(), SessionSelector::Unset);
        assert_eq!(store.create_root_node(node("r1")), Mutation::Applied);
    }
}
