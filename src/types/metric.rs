//! Catalogue of the numeric counters carried by node snapshots

use serde::{Deserialize, Serialize};

use super::node::NodeValue;

/// A scalar counter of [`NodeValue`], addressable by its camelCase name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    TotalTransmitTime,
    TotalReceiveTime,
    TotalDozeTime,
    TotalActiveTime,
    NumberOfTransmissions,
    NumberOfTransmissionsDropped,
    NumberOfReceives,
    NumberOfReceivesDropped,
    NumberOfSentPackets,
    NumberOfSuccessfulPackets,
    NumberOfDroppedPackets,
    AvgPacketTimeOfFlight,
    GoodputKbit,
    EdcaQueueLength,
    NumberOfSuccessfulRoundtripPackets,
    AvgRoundtripTime,
    TcpCongestionWindow,
    NumberOfTcpRetransmissions,
    NumberOfTcpRetransmissionsFromAp,
    NumberOfReceivesDroppedByDestination,
    NumberOfMacTxRtsFailed,
    NumberOfMacTxMissedAck,
    TcpRto,
    NumberOfApScheduledPacketForNodeInNextSlot,
    NumberOfApSentPacketForNodeImmediately,
    AvgRemainingSlotTimeWhenApSendingInSameSlot,
    NumberOfCollisions,
    NumberOfMacTxMissedAckAndDroppedPacket,
    TcpConnected,
    TcpSlowStartThreshold,
    TcpEstimatedBandwidth,
    TcpRtt,
    NumberOfBeaconsMissed,
    NumberOfTransmissionsDuringRawSlot,
    TotalNumberOfDrops,
    FirmwareTransferTime,
    IpCameraSendingRate,
    IpCameraReceivingRate,
    NumberOfTransmissionsCancelledDueToCrossingRawBoundary,
}

impl Metric {
    pub const ALL: [Metric; 39] = [
        Metric::TotalTransmitTime,
        Metric::TotalReceiveTime,
        Metric::TotalDozeTime,
        Metric::TotalActiveTime,
        Metric::NumberOfTransmissions,
        Metric::NumberOfTransmissionsDropped,
        Metric::NumberOfReceives,
        Metric::NumberOfReceivesDropped,
        Metric::NumberOfSentPackets,
        Metric::NumberOfSuccessfulPackets,
        Metric::NumberOfDroppedPackets,
        Metric::AvgPacketTimeOfFlight,
        Metric::GoodputKbit,
        Metric::EdcaQueueLength,
        Metric::NumberOfSuccessfulRoundtripPackets,
        Metric::AvgRoundtripTime,
        Metric::TcpCongestionWindow,
        Metric::NumberOfTcpRetransmissions,
        Metric::NumberOfTcpRetransmissionsFromAp,
        Metric::NumberOfReceivesDroppedByDestination,
        Metric::NumberOfMacTxRtsFailed,
        Metric::NumberOfMacTxMissedAck,
        Metric::TcpRto,
        Metric::NumberOfApScheduledPacketForNodeInNextSlot,
        Metric::NumberOfApSentPacketForNodeImmediately,
        Metric::AvgRemainingSlotTimeWhenApSendingInSameSlot,
        Metric::NumberOfCollisions,
        Metric::NumberOfMacTxMissedAckAndDroppedPacket,
        Metric::TcpConnected,
        Metric::TcpSlowStartThreshold,
        Metric::TcpEstimatedBandwidth,
        Metric::TcpRtt,
        Metric::NumberOfBeaconsMissed,
        Metric::NumberOfTransmissionsDuringRawSlot,
        Metric::TotalNumberOfDrops,
        Metric::FirmwareTransferTime,
        Metric::IpCameraSendingRate,
        Metric::IpCameraReceivingRate,
        Metric::NumberOfTransmissionsCancelledDueToCrossingRawBoundary,
    ];

    /// Look a metric up by its wire name (e.g. `totalTransmitTime`)
    pub fn from_name(name: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
    }

    pub fn name(&self) -> String {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(s)) => s,
            _ => format!("{:?}", self),
        }
    }

    /// Read this metric from a snapshot
    pub fn read(&self, v: &NodeValue) -> f64 {
        match self {
            Metric::TotalTransmitTime => v.total_transmit_time,
            Metric::TotalReceiveTime => v.total_receive_time,
            Metric::TotalDozeTime => v.total_doze_time,
            Metric::TotalActiveTime => v.total_active_time,
            Metric::NumberOfTransmissions => v.number_of_transmissions as f64,
            Metric::NumberOfTransmissionsDropped => v.number_of_transmissions_dropped as f64,
            Metric::NumberOfReceives => v.number_of_receives as f64,
            Metric::NumberOfReceivesDropped => v.number_of_receives_dropped as f64,
            Metric::NumberOfSentPackets => v.number_of_sent_packets as f64,
            Metric::NumberOfSuccessfulPackets => v.number_of_successful_packets as f64,
            Metric::NumberOfDroppedPackets => v.number_of_dropped_packets as f64,
            Metric::AvgPacketTimeOfFlight => v.avg_packet_time_of_flight,
            Metric::GoodputKbit => v.goodput_kbit,
            Metric::EdcaQueueLength => v.edca_queue_length as f64,
            Metric::NumberOfSuccessfulRoundtripPackets => {
                v.number_of_successful_roundtrip_packets as f64
            }
            Metric::AvgRoundtripTime => v.avg_roundtrip_time,
            Metric::TcpCongestionWindow => v.tcp_congestion_window as f64,
            Metric::NumberOfTcpRetransmissions => v.number_of_tcp_retransmissions as f64,
            Metric::NumberOfTcpRetransmissionsFromAp => {
                v.number_of_tcp_retransmissions_from_ap as f64
            }
            Metric::NumberOfReceivesDroppedByDestination => {
                v.number_of_receives_dropped_by_destination as f64
            }
            Metric::NumberOfMacTxRtsFailed => v.number_of_mac_tx_rts_failed as f64,
            Metric::NumberOfMacTxMissedAck => v.number_of_mac_tx_missed_ack as f64,
            Metric::TcpRto => v.tcp_rto as f64,
            Metric::NumberOfApScheduledPacketForNodeInNextSlot => {
                v.number_of_ap_scheduled_packet_for_node_in_next_slot as f64
            }
            Metric::NumberOfApSentPacketForNodeImmediately => {
                v.number_of_ap_sent_packet_for_node_immediately as f64
            }
            Metric::AvgRemainingSlotTimeWhenApSendingInSameSlot => {
                v.avg_remaining_slot_time_when_ap_sending_in_same_slot
            }
            Metric::NumberOfCollisions => v.number_of_collisions as f64,
            Metric::NumberOfMacTxMissedAckAndDroppedPacket => {
                v.number_of_mac_tx_missed_ack_and_dropped_packet as f64
            }
            Metric::TcpConnected => v.tcp_connected as f64,
            Metric::TcpSlowStartThreshold => v.tcp_slow_start_threshold as f64,
            Metric::TcpEstimatedBandwidth => v.tcp_estimated_bandwidth,
            Metric::TcpRtt => v.tcp_rtt as f64,
            Metric::NumberOfBeaconsMissed => v.number_of_beacons_missed as f64,
            Metric::NumberOfTransmissionsDuringRawSlot => {
                v.number_of_transmissions_during_raw_slot as f64
            }
            Metric::TotalNumberOfDrops => v.total_number_of_drops as f64,
            Metric::FirmwareTransferTime => v.firmware_transfer_time,
            Metric::IpCameraSendingRate => v.ip_camera_sending_rate,
            Metric::IpCameraReceivingRate => v.ip_camera_receiving_rate,
            Metric::NumberOfTransmissionsCancelledDueToCrossingRawBoundary => {
                v.number_of_transmissions_cancelled_due_to_crossing_raw_boundary as f64
            }
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
