//! Shared application state for the transport layer

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use super::broadcaster::ViewBroadcaster;
use super::events::{AgentCommand, ViewEvent, WsMessage};
use crate::config::ServerConfig;
use crate::graph_store::GraphStore;
use crate::layout::{LayeredLayout, LayoutPass, LayoutScheduler};
use crate::router::{EventRouter, RouterCommand, RouterNotice};
use crate::session::SessionRegistry;
use crate::view::ViewSnapshot;

/// Shared state for HTTP handlers and WebSocket connections
pub struct AppState {
    pub config: ServerConfig,

    /// Router owning the store, the registry and the layout scheduler
    pub router: Arc<EventRouter>,

    /// Fan-out to UI clients
    pub views: Arc<ViewBroadcaster>,

    /// Inbound queue consumed by the router loop
    commands: mpsc::Sender<RouterCommand>,

    /// Commands relayed to connected agents
    agent_tx: broadcast::Sender<AgentCommand>,

    agents: AtomicUsize,
}

impl AppState {
    /// Build the state and spawn the router loop plus the view bridge
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: ServerConfig) -> Arc<Self> {
        let store = Arc::new(GraphStore::new());
        let sessions = Arc::new(SessionRegistry::new());
        let scheduler = LayoutScheduler::with_window(
            store.clone(),
            Arc::new(LayeredLayout::default()),
            config.layout_direction,
            config.layout_debounce,
        );
        let router = Arc::new(EventRouter::new(store, sessions, scheduler));
        let views = Arc::new(ViewBroadcaster::new(config.broadcast_capacity));
        let (commands, rx) = mpsc::channel(config.inbound_capacity);
        let (agent_tx, _) = broadcast::channel(64);

        // Subscribe before the loop starts so the first notices are not missed
        let notices = router.subscribe();
        let passes = router.scheduler().subscribe();
        tokio::spawn(forward_view_updates(
            router.clone(),
            views.clone(),
            notices,
            passes,
        ));
        {
            let router = router.clone();
            tokio::spawn(async move { router.run(rx).await });
        }

        info!(
            debounce_ms = config.layout_debounce.as_millis() as u64,
            direction = %config.layout_direction,
            "application state ready"
        );

        Arc::new(Self {
            config,
            router,
            views,
            commands,
            agent_tx,
            agents: AtomicUsize::new(0),
        })
    }

    pub fn store(&self) -> &Arc<GraphStore> {
        self.router.store()
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        self.router.sessions()
    }

    /// Capture the current render state
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::capture(self.store(), self.sessions())
    }

    /// Snapshot addressed to one client
    pub fn snapshot_message(&self) -> WsMessage {
        self.views.direct(ViewEvent::Snapshot {
            payload: self.snapshot(),
        })
    }

    pub fn current_sequence_id(&self) -> u64 {
        self.views.current_sequence_id()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.views.subscribe()
    }

    /// Queue a command for the router; false once the router has stopped
    pub async fn submit(&self, command: RouterCommand) -> bool {
        match self.commands.send(command).await {
            Ok(()) => true,
            Err(e) => {
                warn!(command = ?e.0, "router queue closed");
                false
            }
        }
    }

    /// Register an agent connection and receive the commands meant for it
    pub fn agent_connected(&self) -> broadcast::Receiver<AgentCommand> {
        let rx = self.agent_tx.subscribe();
        let agents = self.agents.fetch_add(1, Ordering::SeqCst) + 1;
        info!(agents, "agent connected");
        self.broadcast_connectivity(agents);
        rx
    }

    pub fn agent_disconnected(&self) {
        let agents = self
            .agents
            .fetch_sub(1, Ordering::SeqCst)
            .saturating_sub(1);
        info!(agents, "agent disconnected");
        self.broadcast_connectivity(agents);
    }

    pub fn agent_count(&self) -> usize {
        self.agents.load(Ordering::SeqCst)
    }

    pub fn is_agent_connected(&self) -> bool {
        self.agent_count() > 0
    }

    /// Relay a command to every connected agent; false if none is listening
    pub fn send_to_agent(&self, command: AgentCommand) -> bool {
        match self.agent_tx.send(command) {
            Ok(receivers) => {
                debug!(receivers, "command relayed to agent");
                true
            }
            Err(_) => false,
        }
    }

    fn broadcast_connectivity(&self, agents: usize) {
        self.views.broadcast(ViewEvent::Connectivity {
            agent_connected: agents > 0,
            agents,
        });
    }
}

/// Turn router notices and layout passes into view messages
async fn forward_view_updates(
    router: Arc<EventRouter>,
    views: Arc<ViewBroadcaster>,
    mut notices: broadcast::Receiver<RouterNotice>,
    mut passes: broadcast::Receiver<LayoutPass>,
) {
    let snapshot = || ViewEvent::Snapshot {
        payload: ViewSnapshot::capture(router.store(), router.sessions()),
    };

    loop {
        tokio::select! {
            result = notices.recv() => {
                match result {
                    // A layout pass follows and carries the update
                    Ok(RouterNotice::Changed { relayout: true, .. }) => {}
                    Ok(RouterNotice::Changed { relayout: false, .. }) => views.broadcast(snapshot()),
                    Ok(RouterNotice::FitView) => views.broadcast(ViewEvent::FitView),
                    Ok(RouterNotice::UrlProcessed(payload)) => {
                        views.broadcast(ViewEvent::UrlProcessed { payload })
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "view bridge lagged behind router");
                        views.broadcast(snapshot());
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            result = passes.recv() => {
                match result {
                    Ok(pass) => {
                        debug!(sequence = pass.sequence, nodes = pass.nodes_placed, "layout pass");
                        views.broadcast(snapshot());
                        views.broadcast(ViewEvent::FitView);
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => views.broadcast(snapshot()),
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}
