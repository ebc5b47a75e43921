//! Event Router - inbound events to store mutations
//!
//! Events are applied strictly in arrival order, one at a time. Each event
//! name maps to exactly one registered [`EventHandler`]. A frame that cannot
//! be applied is logged and dropped; nothing here stops the loop.

pub mod events;
pub mod handlers;
pub mod normalize;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::error::{GraphError, GraphResult};
use crate::graph_store::GraphStore;
use crate::layout::LayoutScheduler;
use crate::session::SessionRegistry;
use crate::types::SessionSelector;

pub use events::{EventArgs, EventFrame};
pub use handlers::{all_handlers, Effects, EventHandler, RouterContext};

/// Work item for the router loop
#[derive(Debug, Clone)]
pub enum RouterCommand {
    /// An event from the agent
    Event(EventFrame),
    /// Selector change requested by the presentation layer
    SetCurrentSession(SessionSelector),
    /// Drop the visible tree before a new run
    ClearAll,
}

/// Published after every applied command
#[derive(Debug, Clone, PartialEq)]
pub enum RouterNotice {
    /// Store or registry content changed
    Changed { event: &'static str, relayout: bool },
    /// The viewport should be re-fitted
    FitView,
    /// An import requested by a UI client finished
    UrlProcessed(Value),
}

/// Dispatches inbound events through the handler table
pub struct EventRouter {
    ctx: RouterContext,
    handlers: HashMap<&'static str, Box<dyn EventHandler>>,
    scheduler: LayoutScheduler,
    notices: broadcast::Sender<RouterNotice>,
}

impl EventRouter {
    /// Create a router with every standard handler registered
    pub fn new(
        store: Arc<GraphStore>,
        sessions: Arc<SessionRegistry>,
        scheduler: LayoutScheduler,
    ) -> Self {
        let mut router = Self::empty(store, sessions, scheduler);
        for handler in all_handlers() {
            router.register_handler(handler);
        }
        router
    }

    /// Create a router with an empty handler table
    pub fn empty(
        store: Arc<GraphStore>,
        sessions: Arc<SessionRegistry>,
        scheduler: LayoutScheduler,
    ) -> Self {
        let (notices, _) = broadcast::channel(256);
        Self {
            ctx: RouterContext { store, sessions },
            handlers: HashMap::new(),
            scheduler,
            notices,
        }
    }

    /// Register a handler under its event name, replacing any previous one
    pub fn register_handler(&mut self, handler: Box<dyn EventHandler>) -> &mut Self {
        self.handlers.insert(handler.event(), handler);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn handles(&self, event: &str) -> bool {
        self.handlers.contains_key(event)
    }

    pub fn store(&self) -> &Arc<GraphStore> {
        &self.ctx.store
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.ctx.sessions
    }

    pub fn scheduler(&self) -> &LayoutScheduler {
        &self.scheduler
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<RouterNotice> {
        self.notices.subscribe()
    }

    /// Apply one event and its follow-up effects
    ///
    /// Never panics on bad input. Inside a tokio runtime a re-layout is
    /// debounced; outside one it runs before this returns.
    pub fn dispatch(&self, frame: EventFrame) -> GraphResult<Effects> {
        let handler = self
            .handlers
            .get(frame.event.as_str())
            .ok_or_else(|| GraphError::UnknownEvent(frame.event.clone()))?;

        let event = handler.event();
        let effects = handler.handle(&self.ctx, EventArgs::new(event, frame.args))?;
        self.apply_effects(event, &effects);
        Ok(effects)
    }

    /// Like [`EventRouter::dispatch`], but failures are logged and dropped
    pub fn handle_frame(&self, frame: EventFrame) -> Option<Effects> {
        let event = frame.event.clone();
        match self.dispatch(frame) {
            Ok(effects) => Some(effects),
            Err(e) => {
                warn!(event = %event, error = %e, "event dropped");
                None
            }
        }
    }

    /// Change the active session selector (UI entry point)
    pub fn set_current_session(&self, selector: SessionSelector) {
        self.ctx.store.set_current_session(selector);
        self.apply_effects("set_current_session", &Effects::relayout_and_fit());
    }

    /// Empty the graph and the session registry
    pub fn clear_all(&self) {
        self.scheduler.cancel();
        self.ctx.store.clear_all();
        self.ctx.sessions.reset();
        info!("graph cleared");
        self.notify(RouterNotice::Changed {
            event: "clear_all",
            relayout: false,
        });
    }

    /// Apply a single command
    pub fn execute(&self, command: RouterCommand) {
        match command {
            RouterCommand::Event(frame) => {
                self.handle_frame(frame);
            }
            RouterCommand::SetCurrentSession(selector) => self.set_current_session(selector),
            RouterCommand::ClearAll => self.clear_all(),
        }
    }

    /// Consume commands in arrival order until every sender is gone
    pub async fn run(&self, mut rx: mpsc::Receiver<RouterCommand>) {
        info!(handlers = self.handlers.len(), "event router started");
        while let Some(command) = rx.recv().await {
            self.execute(command);
        }
        // Lay out whatever is left so the final state is positioned
        self.scheduler.flush();
        info!("event router stopped");
    }

    fn apply_effects(&self, event: &'static str, effects: &Effects) {
        if effects.relayout {
            self.scheduler.trigger();
        }
        if effects.changed {
            self.notify(RouterNotice::Changed {
                event,
                relayout: effects.relayout,
            });
        }
        if effects.fit_view {
            self.notify(RouterNotice::FitView);
        }
        if let Some(payload) = &effects.url_processed {
            self.notify(RouterNotice::UrlProcessed(payload.clone()));
        }
    }

    fn notify(&self, notice: RouterNotice) {
        debug!(?notice, "router notice");
        // No subscribers is fine
        let _ = self.notices.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Direction, LayeredLayout};
    use serde_json::json;
    use std::time::Duration;

    fn router() -> EventRouter {
        let store = Arc::new(GraphStore::new());
        let scheduler = LayoutScheduler::with_window(
            store.clone(),
            Arc::new(LayeredLayout::default()),
            Direction::LR,
            Duration::from_millis(10),
        );
        EventRouter::new(store, Arc::new(SessionRegistry::new()), scheduler)
    }

    #[test]
    fn test_all_handlers_registered() {
        let router = router();
        assert_eq!(router.handler_count(), 10);
        for event in [
            "root_node",
            "add_node",
            "update_node",
            "global_info",
            "global_info_set",
            "set_session_id",
            "set_session_info",
            "set_session_info_key",
            "set_current_session",
            "url_processed",
        ] {
            assert!(router.handles(event), "missing handler for {}", event);
        }
    }

    #[test]
    fn test_unknown_event() {
        let router = router();
        let err = router
            .dispatch(EventFrame::new("explode", vec![]))
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownEvent(name) if name == "explode"));
        assert!(router.handle_frame(EventFrame::new("explode", vec![])).is_none());
    }

    #[tokio::test]
    async fn test_notices_published() {
        let router = router();
        let mut rx = router.subscribe();

        router
            .dispatch(EventFrame::new("root_node", vec![json!("r1"), json!({})]))
            .unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            RouterNotice::Changed {
                event: "root_node",
                relayout: true
            }
        );
        assert_eq!(rx.recv().await.unwrap(), RouterNotice::FitView);
    }

    #[tokio::test]
    async fn test_no_notice_for_noop_events() {
        let router = router();
        let mut rx = router.subscribe();
        let root = EventFrame::new("root_node", vec![json!("r1"), json!({})]);

        router.dispatch(root.clone()).unwrap();
        assert!(matches!(rx.recv().await.unwrap(), RouterNotice::Changed { .. }));
        assert_eq!(rx.recv().await.unwrap(), RouterNotice::FitView);

        let effects = router.dispatch(root).unwrap();
        assert_eq!(effects, Effects::none());
        router
            .dispatch(EventFrame::new("add_node", vec![json!("ghost"), json!("c1"), json!({})]))
            .unwrap();
        router
            .dispatch(EventFrame::new("update_node", vec![json!("r1"), json!({})]))
            .unwrap();
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));

        router
            .dispatch(EventFrame::new("global_info_set", vec![json!("task"), json!("x")]))
            .unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            RouterNotice::Changed {
                event: "global_info_set",
                relayout: false
            }
        );
    }

    #[test]
    fn test_dispatch_outside_runtime() {
        let router = router();
        router
            .dispatch(EventFrame::new("root_node", vec![json!("r1"), json!({})]))
            .unwrap();
        assert_eq!(router.scheduler().passes(), 1);
    }

    #[tokio::test]
    async fn test_run_applies_in_order() {
        let router = Arc::new(router());
        let (tx, rx) = mpsc::channel(16);

        let task = {
            let router = router.clone();
            tokio::spawn(async move { router.run(rx).await })
        };

        let frames = [
            EventFrame::new("root_node", vec![json!("r1"), json!({})]),
            EventFrame::new("add_node", vec![json!("r1"), json!("c1"), json!({})]),
            EventFrame::new("add_node", vec![json!("c1"), json!("c2"), json!({})]),
            EventFrame::new("bogus", vec![]),
            EventFrame::new("update_node", vec![json!("c2"), json!({"observation": "done"})]),
        ];
        for frame in frames {
            tx.send(RouterCommand::Event(frame)).await.unwrap();
        }
        tx.send(RouterCommand::SetCurrentSession(SessionSelector::AllSessions))
            .await
            .unwrap();
        drop(tx);
        task.await.unwrap();

        let store = router.store();
        assert_eq!(store.node_count(), 3);
        assert_eq!(store.edge_count(), 2);
        assert_eq!(
            store.get_node_by_id("c2").unwrap().data.observation,
            json!("done")
        );
        assert_eq!(store.current_session(), SessionSelector::AllSessions);
        assert!(router.scheduler().passes() >= 1);
    }

    #[tokio::test]
    async fn test_clear_all_resets_sessions() {
        let router = router();
        router
            .dispatch(EventFrame::new("root_node", vec![json!("r1"), json!({})]))
            .unwrap();
        router
            .dispatch(EventFrame::new(
                "set_session_info_key",
                vec![json!("s1"), json!("completed"), json!(false)],
            ))
            .unwrap();

        router.clear_all();

        assert_eq!(router.store().node_count(), 0);
        assert!(router.sessions().all().is_empty());
    }
}
