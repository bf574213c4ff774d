//! Event types for telemetry ingestion
//!
//! A raw line delivered by the transport is decoded into an [`Event`]:
//! a stream key, a timestamp in milliseconds and a typed [`EventRecord`]
//! carrying the tag-specific payload.

use serde::{Deserialize, Serialize};

use super::config::SimulationConfig;
use super::node::NodeStatsRecord;

/// One line delivered by the transport channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub stream: String,
    pub line: String,
}

impl RawEntry {
    pub fn new(stream: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            line: line.into(),
        }
    }
}

/// A batch of lines for one stream, delivered in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBatch {
    pub stream: String,
    pub lines: Vec<String>,
}

impl RawBatch {
    pub fn new(stream: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            stream: stream.into(),
            lines,
        }
    }
}

/// Event tags recognized on the wire (field 1 of a line)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTag {
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "stanodeadd")]
    StationAdded,
    #[serde(rename = "apnodeadd")]
    AccessPointAdded,
    #[serde(rename = "stanodeassoc")]
    StationAssociated,
    #[serde(rename = "stanodedeassoc")]
    StationDeassociated,
    #[serde(rename = "nodestats")]
    NodeStats,
    #[serde(rename = "slotstatsSTA")]
    SlotStatsStation,
    #[serde(rename = "slotstatsAP")]
    SlotStatsAccessPoint,
}

impl EventTag {
    /// Resolve a wire tag, `None` for tags this pipeline does not handle
    pub fn from_wire(tag: &str) -> Option<Self> {
        match tag {
            "start" => Some(EventTag::Start),
            "stanodeadd" => Some(EventTag::StationAdded),
            "apnodeadd" => Some(EventTag::AccessPointAdded),
            "stanodeassoc" => Some(EventTag::StationAssociated),
            "stanodedeassoc" => Some(EventTag::StationDeassociated),
            "nodestats" => Some(EventTag::NodeStats),
            "slotstatsSTA" => Some(EventTag::SlotStatsStation),
            "slotstatsAP" => Some(EventTag::SlotStatsAccessPoint),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventTag::Start => "start",
            EventTag::StationAdded => "stanodeadd",
            EventTag::AccessPointAdded => "apnodeadd",
            EventTag::StationAssociated => "stanodeassoc",
            EventTag::StationDeassociated => "stanodedeassoc",
            EventTag::NodeStats => "nodestats",
            EventTag::SlotStatsStation => "slotstatsSTA",
            EventTag::SlotStatsAccessPoint => "slotstatsAP",
        }
    }
}

impl std::fmt::Display for EventTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the link a slot usage sample was measured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotUsageKind {
    AccessPoint,
    Station,
}

/// Payload of a `stanodeadd` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationAdded {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub association_id: i64,
}

/// Payload of an `apnodeadd` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPointAdded {
    pub x: f64,
    pub y: f64,
}

/// Payload of a `stanodeassoc` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationAssociated {
    pub id: i64,
    pub association_id: i64,
    pub group_number: i64,
    pub raw_slot_index: i64,
}

/// Typed payload for each event tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventRecord {
    /// (Re)initializes the simulation of a stream
    Start(Box<SimulationConfig>),
    StationAdded(StationAdded),
    AccessPointAdded(AccessPointAdded),
    StationAssociated(StationAssociated),
    StationDeassociated { id: i64 },
    NodeStats(Box<NodeStatsRecord>),
    SlotStats { kind: SlotUsageKind, values: Vec<u64> },
    /// A tag this pipeline does not know; applied as a no-op
    Unrecognized { tag: String },
}

impl EventRecord {
    /// Wire tag of this record, or the raw tag for unrecognized records
    pub fn tag_name(&self) -> &str {
        match self {
            EventRecord::Start(_) => EventTag::Start.as_str(),
            EventRecord::StationAdded(_) => EventTag::StationAdded.as_str(),
            EventRecord::AccessPointAdded(_) => EventTag::AccessPointAdded.as_str(),
            EventRecord::StationAssociated(_) => EventTag::StationAssociated.as_str(),
            EventRecord::StationDeassociated { .. } => EventTag::StationDeassociated.as_str(),
            EventRecord::NodeStats(_) => EventTag::NodeStats.as_str(),
            EventRecord::SlotStats {
                kind: SlotUsageKind::AccessPoint,
                ..
            } => EventTag::SlotStatsAccessPoint.as_str(),
            EventRecord::SlotStats {
                kind: SlotUsageKind::Station,
                ..
            } => EventTag::SlotStatsStation.as_str(),
            EventRecord::Unrecognized { tag } => tag,
        }
    }
}

/// A decoded, immutable telemetry event
///
/// Events are consumed exactly once by the drain loop and then discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Stream (simulation run) this event belongs to
    pub stream: String,

    /// Simulator time in milliseconds (wire value is nanoseconds)
    #[serde(rename = "timestampMs")]
    pub timestamp_ms: f64,

    /// Tag-specific payload
    pub record: EventRecord,
}

impl Event {
    pub fn new(stream: impl Into<String>, timestamp_ms: f64, record: EventRecord) -> Self {
        Self {
            stream: stream.into(),
            timestamp_ms,
            record,
        }
    }
}
