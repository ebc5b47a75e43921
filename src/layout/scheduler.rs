//! Debounced layout scheduler
//!
//! A single-slot deferred task: every trigger cancels the pending task and
//! arms a new one (trailing edge), so a burst of mutations produces one
//! layout pass over the state at the last trigger.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{Direction, LayoutEngine};
use crate::graph_store::GraphStore;

/// Debounce window used when none is configured
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Emitted after positions were written back; the presentation layer should
/// re-render and fit its viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPass {
    /// Number of passes completed so far, starting at 1
    pub sequence: u64,
    /// Nodes whose position was written back
    pub nodes_placed: usize,
}

struct SchedulerInner {
    store: Arc<GraphStore>,
    engine: Arc<dyn LayoutEngine>,
    direction: Direction,
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    passes: AtomicU64,
    tx: broadcast::Sender<LayoutPass>,
}

impl SchedulerInner {
    fn fire(&self) {
        let nodes_placed = self.store.apply_layout(self.engine.as_ref(), self.direction);
        let sequence = self.passes.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(sequence, nodes_placed, direction = %self.direction, "layout pass applied");

        // No receivers is fine
        let _ = self.tx.send(LayoutPass {
            sequence,
            nodes_placed,
        });
    }
}

/// Coalesces re-layout requests over a [`GraphStore`]
///
/// Holds no graph data itself; each pass reads the store fresh.
#[derive(Clone)]
pub struct LayoutScheduler {
    inner: Arc<SchedulerInner>,
}

impl LayoutScheduler {
    /// Create a scheduler with the default debounce window
    pub fn new(store: Arc<GraphStore>, engine: Arc<dyn LayoutEngine>, direction: Direction) -> Self {
        Self::with_window(store, engine, direction, DEFAULT_DEBOUNCE)
    }

    /// Create a scheduler with a custom debounce window
    pub fn with_window(
        store: Arc<GraphStore>,
        engine: Arc<dyn LayoutEngine>,
        direction: Direction,
        window: Duration,
    ) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(SchedulerInner {
                store,
                engine,
                direction,
                window,
                pending: Mutex::new(None),
                passes: AtomicU64::new(0),
                tx,
            }),
        }
    }

    /// Request a layout pass after the debounce window
    ///
    /// Cancels any pending request. Outside a tokio runtime there is no timer
    /// to debounce with, so the pass runs immediately instead.
    pub fn trigger(&self) {
        let mut pending = self.inner.pending.lock();
        if let Some(task) = pending.take() {
            task.abort();
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                drop(pending);
                debug!("no runtime for debounce, laying out immediately");
                self.inner.fire();
                return;
            }
        };

        let inner = Arc::clone(&self.inner);
        *pending = Some(handle.spawn(async move {
            tokio::time::sleep(inner.window).await;
            inner.fire();
        }));
    }

    /// Cancel any pending request and lay out immediately
    pub fn flush(&self) {
        if let Some(task) = self.inner.pending.lock().take() {
            task.abort();
        }
        self.inner.fire();
    }

    /// Cancel any pending request without laying out
    pub fn cancel(&self) {
        if let Some(task) = self.inner.pending.lock().take() {
            task.abort();
        }
    }

    /// Number of layout passes applied so far
    pub fn passes(&self) -> u64 {
        self.inner.passes.load(Ordering::SeqCst)
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    pub fn direction(&self) -> Direction {
        self.inner.direction
    }

    /// Subscribe to completed layout passes
    pub fn subscribe(&self) -> broadcast::Receiver<LayoutPass> {
        self.inner.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayeredLayout;
    use crate::types::{ContextData, Node, Position};

    fn scheduler(window_ms: u64) -> (Arc<GraphStore>, LayoutScheduler) {
        let store = Arc::new(GraphStore::new());
        let scheduler = LayoutScheduler::with_window(
            store.clone(),
            Arc::new(LayeredLayout::new(100.0, 50.0)),
            Direction::LR,
            Duration::from_millis(window_ms),
        );
        (store, scheduler)
    }

    #[tokio::test]
    async fn test_burst_collapses_to_one_pass() {
        let (store, scheduler) = scheduler(40);
        let mut rx = scheduler.subscribe();

        store.create_root_node(Node::new("r1", ContextData::default()));
        for i in 0..5 {
            store.create_child_node(Node::new(format!("c{}", i), ContextData::default()), "r1");
            scheduler.trigger();
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(scheduler.passes(), 1);

        let pass = rx.recv().await.unwrap();
        assert_eq!(pass.sequence, 1);
        assert_eq!(pass.nodes_placed, 6);

        // The last child added in the burst was laid out too
        let last = store.get_node_by_id("c4").unwrap();
        assert_eq!(last.position, Position::new(100.0, 200.0));
    }

    #[tokio::test]
    async fn test_separate_bursts_produce_separate_passes() {
        let (store, scheduler) = scheduler(20);
        store.create_root_node(Node::new("r1", ContextData::default()));

        scheduler.trigger();
        tokio::time::sleep(Duration::from_millis(120)).await;
        scheduler.trigger();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(scheduler.passes(), 2);
    }

    #[test]
    fn test_trigger_without_runtime_lays_out_immediately() {
        let (store, scheduler) = scheduler(30);
        store.create_root_node(Node::new("r1", ContextData::default()));
        store.create_child_node(Node::new("c1", ContextData::default()), "r1");

        scheduler.trigger();

        assert_eq!(scheduler.passes(), 1);
        assert_eq!(
            store.get_node_by_id("c1").unwrap().position,
            Position::new(100.0, 0.0)
        );
    }

    #[tokio::test]
    async fn test_flush_and_cancel() {
        let (store, scheduler) = scheduler(30);
        store.create_root_node(Node::new("r1", ContextData::default()));

        scheduler.trigger();
        scheduler.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(scheduler.passes(), 0);

        scheduler.trigger();
        scheduler.flush();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(scheduler.passes(), 1);
        assert_eq!(
            store.get_node_by_id("r1").unwrap().position,
            Position::new(0.0, 0.0)
        );
    }
}
