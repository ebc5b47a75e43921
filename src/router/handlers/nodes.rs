//! Node creation and update handlers

use tracing::debug;

use crate::error::GraphResult;
use crate::router::events::EventArgs;
use crate::router::normalize::normalize_context;
use crate::types::{ContextData, Node};

use super::{Effects, EventHandler, RouterContext};

/// `root_node(node_id, data)`
pub struct RootNodeHandler;

impl EventHandler for RootNodeHandler {
    fn event(&self) -> &'static str {
        "root_node"
    }

    fn handle(&self, ctx: &RouterContext, args: EventArgs) -> GraphResult<Effects> {
        args.require(2)?;
        let node_id = args.string(0, "node_id")?;
        let data = ContextData::from(normalize_context(args.value(1)));

        let outcome = ctx.store.create_root_node(Node::new(node_id.as_str(), data));
        debug!(node_id = %node_id, ?outcome, "root_node");
        Ok(if outcome.is_applied() {
            Effects::relayout_and_fit()
        } else {
            Effects::none()
        })
    }
}

/// `add_node(parent_id, node_id, data)`
pub struct AddNodeHandler;

impl EventHandler for AddNodeHandler {
    fn event(&self) -> &'static str {
        "add_node"
    }

    fn handle(&self, ctx: &RouterContext, args: EventArgs) -> GraphResult<Effects> {
        args.require(3)?;
        let parent_id = args.string(0, "parent_id")?;
        let node_id = args.string(1, "node_id")?;
        let data = ContextData::from(normalize_context(args.value(2)));

        let outcome = ctx
            .store
            .create_child_node(Node::new(node_id.as_str(), data), &parent_id);
        debug!(parent_id = %parent_id, node_id = %node_id, ?outcome, "add_node");
        Ok(if outcome.is_applied() {
            Effects::relayout()
        } else {
            Effects::none()
        })
    }
}

/// `update_node(node_id, data)`
pub struct UpdateNodeHandler;

impl EventHandler for UpdateNodeHandler {
    fn event(&self) -> &'static str {
        "update_node"
    }

    fn handle(&self, ctx: &RouterContext, args: EventArgs) -> GraphResult<Effects> {
        args.require(2)?;
        let node_id = args.string(0, "node_id")?;
        let patch = normalize_context(args.value(1));

        let outcome = ctx.store.update_context_data(&node_id, patch);
        debug!(node_id = %node_id, ?outcome, "update_node");
        Ok(if outcome.is_applied() {
            Effects::relayout()
        } else {
            Effects::none()
        })
    }
}
