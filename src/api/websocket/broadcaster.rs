//! View event broadcaster
//!
//! Fans view events out to every connected UI client, stamping each with a
//! sequence id so clients can detect gaps.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use super::events::{ViewEvent, WsMessage};

/// Event broadcaster for UI WebSocket clients
pub struct ViewBroadcaster {
    tx: broadcast::Sender<WsMessage>,
    sequence_counter: AtomicU64,
}

impl ViewBroadcaster {
    /// Create a new broadcaster with the given capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Wrap an event for a single client without advancing the sequence
    pub fn direct(&self, event: ViewEvent) -> WsMessage {
        WsMessage {
            event,
            sequence_id: self.current_sequence_id(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Broadcast an event to all connected clients
    pub fn broadcast(&self, event: ViewEvent) {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let msg = WsMessage {
            event,
            sequence_id: seq,
            timestamp: chrono::Utc::now().timestamp(),
        };
        // Ignore errors - just means no receivers are connected
        let _ = self.tx.send(msg);
    }

    /// Get the current sequence ID
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Subscribe to receive broadcast events
    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
