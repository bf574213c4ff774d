//! One decode function per event tag

use super::fields::FieldReader;
use super::DecodeError;
use crate::types::{
    AccessPointAdded, DropReason, DropReasons, EventRecord, NodeStatsRecord, NodeValue,
    SimulationConfig, SlotUsageKind, StationAdded, StationAssociated,
};

pub(crate) fn start(r: &mut FieldReader<'_>) -> Result<EventRecord, DecodeError> {
    let config = SimulationConfig {
        aid_raw_range: r.int("aidRawRange")?,
        number_of_raw_groups: r.int("numberOfRawGroups")?,
        raw_slot_format: r.text("rawSlotFormat")?,
        raw_slot_duration: r.int("rawSlotDuration")?,
        number_of_raw_slots: r.int("numberOfRawSlots")?,
        data_mode: r.text("dataMode")?,
        data_rate: r.float("dataRate")?,
        bandwidth: r.float("bandwidth")?,
        traffic_interval: r.int("trafficInterval")?,
        traffic_packet_size: r.int("trafficPacketSize")?,
        beacon_interval: r.int("beaconInterval")?,
        name: r.text("name")?,
        propagation_loss_exponent: r.float("propagationLossExponent")?,
        propagation_loss_reference_loss: r.float("propagationLossReferenceLoss")?,
        ap_always_schedules_for_next_slot: r.text("apAlwaysSchedulesForNextSlot")?,
        min_rto: r.int("minRto")?,
        simulation_time: r.float("simulationTime")?,
        traffic_type: r.text("trafficType")?,
        traffic_interval_deviation: r.int("trafficIntervalDeviation")?,
        tcp_segment_size: r.int("tcpSegmentSize")?,
        tcp_initial_slow_start_threshold: r.int("tcpInitialSlowStartThreshold")?,
        tcp_initial_cwnd: r.int("tcpInitialCwnd")?,
        max_time_of_packets_in_queue: r.int("maxTimeOfPacketsInQueue")?,
        ip_camera_motion_percentage: r.float("ipCameraMotionPercentage")?,
        ip_camera_motion_duration: r.int("ipCameraMotionDuration")?,
        ip_camera_data_rate: r.int("ipCameraDataRate")?,
        number_of_stations: r.int("numberOfStations")?,
        cooldown_period: r.int("cooldownPeriod")?,
        firmware_size: r.int("firmwareSize")?,
        firmware_block_size: r.int("firmwareBlockSize")?,
        firmware_corruption_probability: r.float("firmwareCorruptionProbability")?,
        firmware_new_update_probability: r.float("firmwareNewUpdateProbability")?,
        sensor_measurement_size: r.int("sensorMeasurementSize")?,
        contention_per_raw_slot: r.int("contentionPerRawSlot")?,
        contention_per_raw_slot_only_in_first_group: r
            .int("contentionPerRawSlotOnlyInFirstGroup")?,
    };
    Ok(EventRecord::Start(Box::new(config)))
}

pub(crate) fn station_added(r: &mut FieldReader<'_>) -> Result<EventRecord, DecodeError> {
    Ok(EventRecord::StationAdded(StationAdded {
        id: r.int("id")?,
        x: r.float("x")?,
        y: r.float("y")?,
        association_id: r.int("associationId")?,
    }))
}

pub(crate) fn access_point_added(r: &mut FieldReader<'_>) -> Result<EventRecord, DecodeError> {
    Ok(EventRecord::AccessPointAdded(AccessPointAdded {
        x: r.float("x")?,
        y: r.float("y")?,
    }))
}

pub(crate) fn station_associated(r: &mut FieldReader<'_>) -> Result<EventRecord, DecodeError> {
    Ok(EventRecord::StationAssociated(StationAssociated {
        id: r.int("id")?,
        association_id: r.int("associationId")?,
        group_number: r.int("groupNumber")?,
        raw_slot_index: r.int("rawSlotIndex")?,
    }))
}

pub(crate) fn station_deassociated(r: &mut FieldReader<'_>) -> Result<EventRecord, DecodeError> {
    Ok(EventRecord::StationDeassociated { id: r.int("id")? })
}

pub(crate) fn node_stats(
    r: &mut FieldReader<'_>,
    timestamp: f64,
) -> Result<EventRecord, DecodeError> {
    let id = r.int("id")?;
    let value = NodeValue {
        timestamp,
        total_transmit_time: r.float("totalTransmitTime")?,
        total_receive_time: r.float("totalReceiveTime")?,
        total_doze_time: r.float("totalDozeTime")?,
        total_active_time: r.float("totalActiveTime")?,
        number_of_transmissions: r.int("numberOfTransmissions")?,
        number_of_transmissions_dropped: r.int("numberOfTransmissionsDropped")?,
        number_of_receives: r.int("numberOfReceives")?,
        number_of_receives_dropped: r.int("numberOfReceivesDropped")?,
        number_of_sent_packets: r.int("numberOfSentPackets")?,
        number_of_successful_packets: r.int("numberOfSuccessfulPackets")?,
        number_of_dropped_packets: r.int("numberOfDroppedPackets")?,
        avg_packet_time_of_flight: r.float("avgPacketTimeOfFlight")?,
        goodput_kbit: r.float("goodputKbit")?,
        edca_queue_length: r.int("edcaQueueLength")?,
        number_of_successful_roundtrip_packets: r.int("numberOfSuccessfulRoundtripPackets")?,
        avg_roundtrip_time: r.float("avgRoundtripTime")?,
        tcp_congestion_window: r.int("tcpCongestionWindow")?,
        number_of_tcp_retransmissions: r.int("numberOfTcpRetransmissions")?,
        number_of_tcp_retransmissions_from_ap: r.int("numberOfTcpRetransmissionsFromAp")?,
        number_of_receives_dropped_by_destination: r
            .int("numberOfReceivesDroppedByDestination")?,
        number_of_mac_tx_rts_failed: r.int("numberOfMacTxRtsFailed")?,
        number_of_mac_tx_missed_ack: r.int("numberOfMacTxMissedAck")?,
        drops_by_reason: drop_reasons(r.optional(), "dropsByReason")?,
        drops_by_reason_at_ap: drop_reasons(r.optional(), "dropsByReasonAtAp")?,
        tcp_rto: r.int("tcpRto")?,
        number_of_ap_scheduled_packet_for_node_in_next_slot: r
            .int("numberOfApScheduledPacketForNodeInNextSlot")?,
        number_of_ap_sent_packet_for_node_immediately: r
            .int("numberOfApSentPacketForNodeImmediately")?,
        avg_remaining_slot_time_when_ap_sending_in_same_slot: r
            .float("avgRemainingSlotTimeWhenApSendingInSameSlot")?,
        number_of_collisions: r.int("numberOfCollisions")?,
        number_of_mac_tx_missed_ack_and_dropped_packet: r
            .int("numberOfMacTxMissedAckAndDroppedPacket")?,
        tcp_connected: r.int("tcpConnected")?,
        tcp_slow_start_threshold: r.int("tcpSlowStartThreshold")?,
        tcp_estimated_bandwidth: r.float("tcpEstimatedBandwidth")?,
        tcp_rtt: r.int("tcpRtt")?,
        number_of_beacons_missed: r.int("numberOfBeaconsMissed")?,
        number_of_transmissions_during_raw_slot: r.int("numberOfTransmissionsDuringRawSlot")?,
        total_number_of_drops: r.int("totalNumberOfDrops")?,
        firmware_transfer_time: r.float("firmwareTransferTime")?,
        ip_camera_sending_rate: r.float("ipCameraSendingRate")?,
        ip_camera_receiving_rate: r.float("ipCameraReceivingRate")?,
        number_of_transmissions_cancelled_due_to_crossing_raw_boundary: r
            .int("numberOfTransmissionsCancelledDueToCrossingRawBoundary")?,
    };
    Ok(EventRecord::NodeStats(Box::new(NodeStatsRecord { id, value })))
}

pub(crate) fn slot_stats(
    r: &mut FieldReader<'_>,
    kind: SlotUsageKind,
) -> Result<EventRecord, DecodeError> {
    let values = r.remaining_unsigned("slotUsage")?;
    Ok(EventRecord::SlotStats { kind, values })
}

/// Decode a comma-joined drop-reason record; absent or empty yields `None`
fn drop_reasons(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<DropReasons>, DecodeError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let invalid = || DecodeError::InvalidDropReasons {
        field,
        value: raw.to_string(),
    };

    let mut counts = [0u64; DropReason::COUNT];
    let mut parts = raw.split(',');
    for slot in counts.iter_mut() {
        let part = parts.next().ok_or_else(invalid)?;
        *slot = part.trim().parse::<u64>().map_err(|_| invalid())?;
    }
    Ok(Some(DropReasons::from_counts(counts)))
}
