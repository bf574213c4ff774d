//! Simulation parameters carried by a `start` event

use serde::{Deserialize, Serialize};

/// Flat record of simulation parameters
///
/// Set once per run by a `start` event and replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    // RAW slot geometry
    pub aid_raw_range: i64,
    pub number_of_raw_groups: i64,
    pub raw_slot_format: String,
    pub raw_slot_duration: i64,
    pub number_of_raw_slots: i64,

    // PHY / data mode
    pub data_mode: String,
    pub data_rate: f64,
    pub bandwidth: f64,

    // Traffic model
    pub traffic_interval: i64,
    pub traffic_packet_size: i64,
    pub beacon_interval: i64,
    pub name: String,
    pub propagation_loss_exponent: f64,
    pub propagation_loss_reference_loss: f64,
    pub ap_always_schedules_for_next_slot: String,
    pub min_rto: i64,
    pub simulation_time: f64,
    pub traffic_type: String,
    pub traffic_interval_deviation: i64,

    // TCP tuning
    pub tcp_segment_size: i64,
    pub tcp_initial_slow_start_threshold: i64,
    pub tcp_initial_cwnd: i64,
    pub max_time_of_packets_in_queue: i64,

    // IP camera traffic
    pub ip_camera_motion_percentage: f64,
    pub ip_camera_motion_duration: i64,
    pub ip_camera_data_rate: i64,

    pub number_of_stations: i64,
    pub cooldown_period: i64,

    // Firmware update model
    pub firmware_size: i64,
    pub firmware_block_size: i64,
    pub firmware_corruption_probability: f64,
    pub firmware_new_update_probability: f64,
    pub sensor_measurement_size: i64,

    // Contention model
    pub contention_per_raw_slot: i64,
    pub contention_per_raw_slot_only_in_first_group: i64,
}

impl SimulationConfig {
    /// Number of entries a slot usage vector should have for this geometry
    pub fn expected_slot_count(&self) -> Option<usize> {
        let groups = usize::try_from(self.number_of_raw_groups).ok()?;
        let slots = usize::try_from(self.number_of_raw_slots).ok()?;
        groups.checked_mul(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_slot_count() {
        let config = SimulationConfig {
            number_of_raw_groups: 4,
            number_of_raw_slots: 3,
            ..Default::default()
        };
        assert_eq!(config.expected_slot_count(), Some(12));
    }

    #[test]
    fn test_expected_slot_count_negative_geometry() {
        let config = SimulationConfig {
            number_of_raw_groups: -1,
            number_of_raw_slots: 3,
            ..Default::default()
        };
        assert_eq!(config.expected_slot_count(), None);
    }

    #[test]
    fn test_config_serializes_camel_case() {
        let config = SimulationConfig {
            name: "run-a".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"numberOfRawGroups\":0"));
        assert!(json.contains("\"name\":\"run-a\""));
    }
}
