//! WebSocket message types for observer notifications and ingestion

use serde::{Deserialize, Serialize};

use crate::pipeline::{NodeActivity, NodeAssociation};

/// Observer notifications pushed to WebSocket clients
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObserverEvent {
    /// A drain cycle advanced simulation time
    SimulationTimeUpdated { timestamp_ms: f64 },

    /// A station was associated or deassociated
    NodeAssociated {
        stream: String,
        #[serde(flatten)]
        association: NodeAssociation,
    },

    /// A node reported stats
    NodeActivity {
        stream: String,
        #[serde(flatten)]
        activity: NodeActivity,
    },

    /// Clients should re-read registry state
    UpdateGui { full_refresh: bool },
}

/// WebSocket message wrapper with metadata
#[derive(Clone, Debug, Serialize)]
pub struct WsMessage {
    #[serde(flatten)]
    pub event: ObserverEvent,

    /// Monotonically increasing sequence ID for gap detection
    pub sequence_id: u64,

    /// Unix timestamp when the message was created
    pub timestamp: i64,
}

/// Client message types
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// One telemetry line
    Entry { stream: String, line: String },

    /// Several telemetry lines of one stream, in order
    BulkEntry { stream: String, lines: Vec<String> },

    /// Ping for heartbeat
    Ping,
}

/// Welcome message sent on connection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub current_sequence_id: u64,
}

impl WelcomeMessage {
    pub fn new(current_sequence_id: u64) -> Self {
        Self {
            msg_type: "connected".to_string(),
            current_sequence_id,
        }
    }
}

/// Receipt of a bulk entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub accepted: usize,
    pub rejected: usize,
}

impl AckMessage {
    pub fn new(accepted: usize, rejected: usize) -> Self {
        Self {
            msg_type: "ack".to_string(),
            accepted,
            rejected,
        }
    }
}

/// Pong response message
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PongMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
}

impl Default for PongMessage {
    fn default() -> Self {
        Self {
            msg_type: "pong".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_event_serialization() {
        let event = ObserverEvent::NodeAssociated {
            stream: "live".to_string(),
            association: NodeAssociation {
                node_id: 3,
                x: 1.0,
                y: 2.0,
                associated: true,
            },
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "node_associated");
        assert_eq!(json["stream"], "live");
        assert_eq!(json["nodeId"], 3);
        assert_eq!(json["associated"], true);
    }

    #[test]
    fn test_ws_message_serialization() {
        let msg = WsMessage {
            event: ObserverEvent::UpdateGui {
                full_refresh: false,
            },
            sequence_id: 42,
            timestamp: 1234567890,
        };

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"update_gui\""));
        assert!(json.contains("\"sequence_id\":42"));
    }

    #[test]
    fn test_client_message_parsing() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let json = r#"{"type":"bulk_entry","stream":"live","lines":["1;a","2;b"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::BulkEntry { ref lines, .. } if lines.len() == 2));

        let json = r#"{"type":"entry","stream":"live","line":"1;apnodeadd;0;0"}"#;
        assert!(matches!(
            serde_json::from_str::<ClientMessage>(json).unwrap(),
            ClientMessage::Entry { .. }
        ));
    }
}
