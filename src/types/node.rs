//! Nodes of a simulation and their per-update value snapshots

use std::collections::VecDeque;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::metric::Metric;

/// Reasons a packet can be dropped, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DropReason {
    Unknown,
    PhyInSleepMode,
    PhyNotEnoughSignalPower,
    PhyUnsupportedMode,
    PhyPreambleHeaderReceptionFailed,
    PhyRxDuringChannelSwitching,
    PhyAlreadyReceiving,
    PhyAlreadyTransmitting,
    PhyAlreadyPlcpReceptionFailed,
    MacNotForAp,
    MacApToApFrame,
    MacQueueDelayExceeded,
    MacQueueSizeExceeded,
    TcpTxBufferExceeded,
}

impl DropReason {
    pub const COUNT: usize = 14;

    pub const ALL: [DropReason; DropReason::COUNT] = [
        DropReason::Unknown,
        DropReason::PhyInSleepMode,
        DropReason::PhyNotEnoughSignalPower,
        DropReason::PhyUnsupportedMode,
        DropReason::PhyPreambleHeaderReceptionFailed,
        DropReason::PhyRxDuringChannelSwitching,
        DropReason::PhyAlreadyReceiving,
        DropReason::PhyAlreadyTransmitting,
        DropReason::PhyAlreadyPlcpReceptionFailed,
        DropReason::MacNotForAp,
        DropReason::MacApToApFrame,
        DropReason::MacQueueDelayExceeded,
        DropReason::MacQueueSizeExceeded,
        DropReason::TcpTxBufferExceeded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Unknown => "unknown",
            DropReason::PhyInSleepMode => "phyInSleepMode",
            DropReason::PhyNotEnoughSignalPower => "phyNotEnoughSignalPower",
            DropReason::PhyUnsupportedMode => "phyUnsupportedMode",
            DropReason::PhyPreambleHeaderReceptionFailed => "phyPreambleHeaderReceptionFailed",
            DropReason::PhyRxDuringChannelSwitching => "phyRxDuringChannelSwitching",
            DropReason::PhyAlreadyReceiving => "phyAlreadyReceiving",
            DropReason::PhyAlreadyTransmitting => "phyAlreadyTransmitting",
            DropReason::PhyAlreadyPlcpReceptionFailed => "phyAlreadyPlcpReceptionFailed",
            DropReason::MacNotForAp => "macNotForAp",
            DropReason::MacApToApFrame => "macApToApFrame",
            DropReason::MacQueueDelayExceeded => "macQueueDelayExceeded",
            DropReason::MacQueueSizeExceeded => "macQueueSizeExceeded",
            DropReason::TcpTxBufferExceeded => "tcpTxBufferExceeded",
        }
    }
}

/// Drop counters by reason, decoded once from the comma-joined wire record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropReasons {
    counts: [u64; DropReason::COUNT],
}

impl DropReasons {
    pub fn from_counts(counts: [u64; DropReason::COUNT]) -> Self {
        Self { counts }
    }

    pub fn get(&self, reason: DropReason) -> u64 {
        self.counts[reason as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DropReason, u64)> + '_ {
        DropReason::ALL.iter().map(move |r| (*r, self.get(*r)))
    }
}

impl Serialize for DropReasons {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DropReason::COUNT))?;
        for (reason, count) in self.iter() {
            map.serialize_entry(reason.as_str(), &count)?;
        }
        map.end()
    }
}

/// One stats update for a node
///
/// Created only by the node-stats handler and never mutated afterwards.
/// Counters reported as `-1` mean "not applicable" for that node.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeValue {
    pub timestamp: f64,

    pub total_transmit_time: f64,
    pub total_receive_time: f64,
    pub total_doze_time: f64,
    pub total_active_time: f64,

    pub number_of_transmissions: i64,
    pub number_of_transmissions_dropped: i64,
    pub number_of_receives: i64,
    pub number_of_receives_dropped: i64,

    pub number_of_sent_packets: i64,
    pub number_of_successful_packets: i64,
    pub number_of_dropped_packets: i64,

    pub avg_packet_time_of_flight: f64,
    pub goodput_kbit: f64,

    pub edca_queue_length: i64,
    pub number_of_successful_roundtrip_packets: i64,
    pub avg_roundtrip_time: f64,

    pub tcp_congestion_window: i64,
    pub number_of_tcp_retransmissions: i64,
    pub number_of_tcp_retransmissions_from_ap: i64,
    pub number_of_receives_dropped_by_destination: i64,

    pub number_of_mac_tx_rts_failed: i64,
    pub number_of_mac_tx_missed_ack: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub drops_by_reason: Option<DropReasons>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drops_by_reason_at_ap: Option<DropReasons>,

    pub tcp_rto: i64,
    pub number_of_ap_scheduled_packet_for_node_in_next_slot: i64,
    pub number_of_ap_sent_packet_for_node_immediately: i64,
    pub avg_remaining_slot_time_when_ap_sending_in_same_slot: f64,

    pub number_of_collisions: i64,
    pub number_of_mac_tx_missed_ack_and_dropped_packet: i64,

    pub tcp_connected: i64,
    pub tcp_slow_start_threshold: i64,
    pub tcp_estimated_bandwidth: f64,
    pub tcp_rtt: i64,

    pub number_of_beacons_missed: i64,
    pub number_of_transmissions_during_raw_slot: i64,
    pub total_number_of_drops: i64,

    pub firmware_transfer_time: f64,
    pub ip_camera_sending_rate: f64,
    pub ip_camera_receiving_rate: f64,
    pub number_of_transmissions_cancelled_due_to_crossing_raw_boundary: i64,
}

impl NodeValue {
    /// Read a metric as a float
    pub fn get(&self, metric: Metric) -> f64 {
        metric.read(self)
    }
}

/// Payload of a `nodestats` event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStatsRecord {
    pub id: i64,
    pub value: NodeValue,
}

/// Node variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    AccessPoint,
    Station {
        #[serde(rename = "isAssociated")]
        is_associated: bool,
    },
}

/// A node of a simulation run
#[derive(Debug, Clone)]
pub struct Node {
    /// Index into the simulation's node list, stable for the run
    pub id: usize,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub group_number: i64,
    pub raw_slot_index: i64,
    pub association_id: i64,
    values: VecDeque<NodeValue>,
}

impl Node {
    pub fn station(id: usize, x: f64, y: f64, association_id: i64) -> Self {
        Self {
            id,
            kind: NodeKind::Station {
                is_associated: false,
            },
            x,
            y,
            group_number: 0,
            raw_slot_index: 0,
            association_id,
            values: VecDeque::new(),
        }
    }

    pub fn access_point(id: usize, x: f64, y: f64) -> Self {
        Self {
            id,
            kind: NodeKind::AccessPoint,
            x,
            y,
            group_number: 0,
            raw_slot_index: 0,
            association_id: -1,
            values: VecDeque::new(),
        }
    }

    pub fn is_access_point(&self) -> bool {
        matches!(self.kind, NodeKind::AccessPoint)
    }

    pub fn is_associated(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Station {
                is_associated: true
            }
        )
    }

    /// Mark a station (de)associated; access points are left untouched
    pub fn set_associated(&mut self, associated: bool) -> bool {
        match &mut self.kind {
            NodeKind::Station { is_associated } => {
                *is_associated = associated;
                true
            }
            NodeKind::AccessPoint => false,
        }
    }

    /// Append a snapshot, evicting the oldest ones beyond `history_limit`
    pub fn push_value(&mut self, value: NodeValue, history_limit: usize) {
        self.values.push_back(value);
        while self.values.len() > history_limit.max(1) {
            self.values.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&NodeValue> {
        self.values.back()
    }

    pub fn previous(&self) -> Option<&NodeValue> {
        let len = self.values.len();
        if len >= 2 {
            self.values.get(len - 2)
        } else {
            None
        }
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &NodeValue> {
        self.values.iter()
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Whether `metric` grew between the last two snapshots
    pub fn has_increased(&self, metric: Metric) -> bool {
        match (self.previous(), self.latest()) {
            (Some(old), Some(new)) => old.get(metric) < new.get(metric),
            _ => false,
        }
    }

    /// Change of `metric` between the last two snapshots
    pub fn latest_delta(&self, metric: Metric) -> Option<f64> {
        match (self.previous(), self.latest()) {
            (Some(old), Some(new)) => Some(new.get(metric) - old.get(metric)),
            _ => None,
        }
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_with_transmit_time(t: f64) -> NodeValue {
        NodeValue {
            total_transmit_time: t,
            ..Default::default()
        }
    }

    #[test]
    fn test_history_limit_evicts_oldest() {
        let mut node = Node::station(0, 0.0, 0.0, 0);
        for i in 0..5 {
            node.push_value(value_with_transmit_time(i as f64), 3);
        }

        assert_eq!(node.value_count(), 3);
        assert_eq!(node.values().next().unwrap().total_transmit_time, 2.0);
        assert_eq!(node.latest().unwrap().total_transmit_time, 4.0);
    }

    #[test]
    fn test_has_increased() {
        let mut node = Node::station(0, 0.0, 0.0, 0);
        node.push_value(value_with_transmit_time(1.0), 10);
        assert!(!node.has_increased(Metric::TotalTransmitTime));

        node.push_value(value_with_transmit_time(2.5), 10);
        assert!(node.has_increased(Metric::TotalTransmitTime));
        assert_eq!(node.latest_delta(Metric::TotalTransmitTime), Some(1.5));

        node.push_value(value_with_transmit_time(2.5), 10);
        assert!(!node.has_increased(Metric::TotalTransmitTime));
    }

    #[test]
    fn test_access_point_cannot_associate() {
        let mut ap = Node::access_point(0, 0.0, 0.0);
        assert!(!ap.set_associated(true));
        assert!(!ap.is_associated());

        let mut sta = Node::station(1, 3.0, 4.0, 7);
        assert!(sta.set_associated(true));
        assert!(sta.is_associated());
        assert_eq!(sta.distance_to(&ap), 5.0);
    }

    #[test]
    fn test_drop_reasons_serialize_as_named_map() {
        let mut counts = [0u64; DropReason::COUNT];
        counts[DropReason::MacQueueSizeExceeded as usize] = 4;
        counts[DropReason::Unknown as usize] = 1;
        let drops = DropReasons::from_counts(counts);

        assert_eq!(drops.total(), 5);
        let json = serde_json::to_string(&drops).unwrap();
        assert!(json.contains("\"macQueueSizeExceeded\":4"));
        assert!(json.contains("\"unknown\":1"));
    }
}
