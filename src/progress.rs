use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Event stream of one session's processing task: zero or more progress
/// updates followed by exactly one terminal event.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Progress { percent: f64 },
    Complete { outputs: Vec<String> },
    Error { message: String },
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::Progress { .. })
    }
}

/// Fire-and-forget, session-scoped event delivery.
///
/// At-most-once by design: there is no buffering or replay for subscribers
/// that attach late or fall behind. This mirrors the product decision in the
/// reference behavior, not an oversight.
pub trait ProgressPublisher: Send + Sync {
    fn publish(&self, session_id: &str, event: ProgressEvent);
}

/// In-process publisher backed by one broadcast channel per session room.
///
/// The transport that carries events to a browser subscribes here; the core
/// never learns how events leave the process.
pub struct ChannelPublisher {
    capacity: usize,
    rooms: RwLock<HashMap<String, broadcast::Sender<ProgressEvent>>>,
}

impl ChannelPublisher {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Join a session's room, creating it if this is the first interest.
    pub fn subscribe(&self, session_id: &str) -> broadcast::Receiver<ProgressEvent> {
        let mut rooms = self.rooms.write();
        rooms
            .entry(session_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drop a session's room; subscribers see the channel close.
    pub fn close(&self, session_id: &str) {
        self.rooms.write().remove(session_id);
    }

    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }
}

impl ProgressPublisher for ChannelPublisher {
    fn publish(&self, session_id: &str, event: ProgressEvent) {
        let sender = {
            let mut rooms = self.rooms.write();
            rooms
                .entry(session_id.to_string())
                .or_insert_with(|| broadcast::channel(self.capacity).0)
                .clone()
        };
        // A send error just means nobody is listening right now; the event
        // is dropped, per the at-most-once contract.
        if sender.send(event).is_err() {
            tracing::trace!(session_id, "progress event dropped (no subscribers)");
        }
    }
}
