//! Event handlers
//!
//! Each handler maps one inbound event name to one store or registry
//! mutation. Handlers are stateless; everything they touch comes in through
//! the [`RouterContext`].

mod info;
mod nodes;
mod notice;
mod session;

use std::sync::Arc;

use serde_json::Value;

use crate::error::GraphResult;
use crate::graph_store::GraphStore;
use crate::session::SessionRegistry;

use super::events::EventArgs;

pub use info::{GlobalInfoHandler, GlobalInfoSetHandler};
pub use nodes::{AddNodeHandler, RootNodeHandler, UpdateNodeHandler};
pub use notice::UrlProcessedHandler;
pub use session::{
    SetCurrentSessionHandler, SetSessionIdHandler, SetSessionInfoHandler,
    SetSessionInfoKeyHandler,
};

/// The state handlers mutate
#[derive(Clone)]
pub struct RouterContext {
    pub store: Arc<GraphStore>,
    pub sessions: Arc<SessionRegistry>,
}

/// Follow-up work requested by a handler
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Effects {
    /// Store or registry content changed
    pub changed: bool,
    /// Schedule a debounced layout pass
    pub relayout: bool,
    /// Ask the presentation layer to fit its viewport
    pub fit_view: bool,
    /// Relay an import acknowledgement to UI clients
    pub url_processed: Option<Value>,
}

impl Effects {
    /// Nothing changed; duplicates and ignored updates end here
    pub fn none() -> Self {
        Self::default()
    }

    /// Content changed without affecting layout
    pub fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }

    pub fn relayout() -> Self {
        Self {
            changed: true,
            relayout: true,
            ..Self::default()
        }
    }

    pub fn relayout_and_fit() -> Self {
        Self {
            changed: true,
            relayout: true,
            fit_view: true,
            ..Self::default()
        }
    }
}

/// Trait for inbound event handlers
///
/// All handlers must implement this trait to be registered with the router.
pub trait EventHandler: Send + Sync {
    /// Event name this handler is registered under
    fn event(&self) -> &'static str;

    /// Apply the event's mutation
    fn handle(&self, ctx: &RouterContext, args: EventArgs) -> GraphResult<Effects>;
}

/// Every handler for the agent's event vocabulary
pub fn all_handlers() -> Vec<Box<dyn EventHandler>> {
    vec![
        // Graph
        Box::new(RootNodeHandler),
        Box::new(AddNodeHandler),
        Box::new(UpdateNodeHandler),
        // Global metadata
        Box::new(GlobalInfoHandler),
        Box::new(GlobalInfoSetHandler),
        // Sessions
        Box::new(SetSessionIdHandler),
        Box::new(SetSessionInfoHandler),
        Box::new(SetSessionInfoKeyHandler),
        Box::new(SetCurrentSessionHandler),
        // Notifications
        Box::new(UrlProcessedHandler),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn context() -> RouterContext {
        RouterContext {
            store: Arc::new(GraphStore::new()),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }

    pub fn call(
        handler: &dyn EventHandler,
        ctx: &RouterContext,
        args: Vec<Value>,
    ) -> GraphResult<Effects> {
        handler.handle(ctx, EventArgs::new(handler.event(), args))
    }
}
