//! Read model for the presentation layer
//!
//! Filtering by session is a read-time view, never a mutation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph_store::GraphStore;
use crate::session::SessionRegistry;
use crate::types::{Edge, InfoRecord, Node, SessionSelector};

/// Whether `node` is shown under `selector`
///
/// A wide selector (unset or all sessions) shows every node whose session is
/// not completed; a concrete selector shows exactly that session's nodes.
pub fn is_visible(node: &Node, selector: &SessionSelector, sessions: &SessionRegistry) -> bool {
    match selector {
        SessionSelector::Session(id) => node.session_id.as_deref() == Some(id.as_str()),
        SessionSelector::Unset | SessionSelector::AllSessions => !node
            .session_id
            .as_deref()
            .is_some_and(|id| sessions.is_completed(id)),
    }
}

/// Nodes visible under the store's current selector
pub fn visible_nodes(store: &GraphStore, sessions: &SessionRegistry) -> Vec<Node> {
    let selector = store.current_session();
    store
        .nodes()
        .into_iter()
        .filter(|node| is_visible(node, &selector, sessions))
        .collect()
}

/// Everything the presentation layer renders from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub sessions: BTreeMap<String, InfoRecord>,
    pub global_info: InfoRecord,
    pub current_session: SessionSelector,
    pub revision: u64,
}

impl ViewSnapshot {
    pub fn capture(store: &GraphStore, sessions: &SessionRegistry) -> Self {
        let graph = store.snapshot();
        let current_session = store.current_session();
        let nodes = graph
            .nodes
            .into_iter()
            .filter(|node| is_visible(node, &current_session, sessions))
            .collect();

        Self {
            nodes,
            edges: graph.edges,
            sessions: sessions.all(),
            global_info: sessions.global_info(),
            current_session,
            revision: store.revision(),
        }
    }
}
