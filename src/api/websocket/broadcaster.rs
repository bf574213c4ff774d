//! Observer that forwards pipeline notifications to WebSocket clients

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use super::events::{ObserverEvent, WsMessage};
use crate::pipeline::{NodeActivity, NodeAssociation, PipelineObserver};

/// Broadcasts observer events to every connected client
pub struct EventBroadcaster {
    tx: broadcast::Sender<WsMessage>,
    sequence_counter: AtomicU64,
}

impl EventBroadcaster {
    /// Create a new broadcaster; clients lagging more than `capacity` messages miss events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    pub fn broadcast(&self, event: ObserverEvent) {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let msg = WsMessage {
            event,
            sequence_id: seq,
            timestamp: chrono::Utc::now().timestamp(),
        };
        // Ignore errors - just means no receivers are connected
        let _ = self.tx.send(msg);
    }

    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.tx.subscribe()
    }
}

impl PipelineObserver for EventBroadcaster {
    fn on_simulation_time_updated(&self, timestamp_ms: f64) {
        self.broadcast(ObserverEvent::SimulationTimeUpdated { timestamp_ms });
    }

    fn on_node_associated(&self, stream: &str, association: NodeAssociation) {
        self.broadcast(ObserverEvent::NodeAssociated {
            stream: stream.to_string(),
            association,
        });
    }

    fn on_node_activity(&self, stream: &str, activity: NodeActivity) {
        self.broadcast(ObserverEvent::NodeActivity {
            stream: stream.to_string(),
            activity,
        });
    }

    fn update_gui(&self, full_refresh: bool) {
        self.broadcast(ObserverEvent::UpdateGui { full_refresh });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_increments_sequence() {
        let broadcaster = EventBroadcaster::new(16);
        let mut rx = broadcaster.subscribe();

        broadcaster.update_gui(false);
        broadcaster.on_simulation_time_updated(12.5);

        assert_eq!(broadcaster.current_sequence_id(), 2);
        let first = rx.recv().await.unwrap();
        assert_eq!(first.sequence_id, 0);
        assert_eq!(
            first.event,
            ObserverEvent::UpdateGui {
                full_refresh: false
            }
        );
        let second = rx.recv().await.unwrap();
        assert_eq!(second.sequence_id, 1);
    }

    #[test]
    fn test_broadcast_without_receivers() {
        let broadcaster = EventBroadcaster::new(4);
        broadcaster.update_gui(true);
        assert_eq!(broadcaster.current_sequence_id(), 1);
    }
}
