//! Per-stream simulation state

use std::collections::VecDeque;

use super::config::SimulationConfig;
use super::event::SlotUsageKind;
use super::node::Node;

/// State of one simulation run, keyed by stream in the registry
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    pub config: SimulationConfig,
    pub(crate) nodes: Vec<Node>,
    pub(crate) ap_index: Option<usize>,

    /// Raw slot usage samples, oldest first
    pub(crate) slot_usage_ap: VecDeque<Vec<u64>>,
    pub(crate) slot_usage_sta: VecDeque<Vec<u64>>,
    /// Simulator time of each access point slot sample
    pub(crate) slot_usage_timestamps: VecDeque<f64>,

    /// Exponentially smoothed slot usage
    pub(crate) total_slot_usage_ap: Vec<f64>,
    pub(crate) total_slot_usage_sta: Vec<f64>,

    pub(crate) total_traffic: u64,
    pub(crate) current_time: f64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Start a new run: replace the config and drop everything derived from the previous run
    pub fn reset(&mut self, config: SimulationConfig) {
        self.config = config;
        self.nodes.clear();
        self.ap_index = None;
        self.slot_usage_ap.clear();
        self.slot_usage_sta.clear();
        self.slot_usage_timestamps.clear();
        self.total_slot_usage_ap.clear();
        self.total_slot_usage_sta.clear();
        self.total_traffic = 0;
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Resolve a wire node id, `None` when negative or out of range
    pub(crate) fn node_mut(&mut self, id: i64) -> Option<&mut Node> {
        let index = usize::try_from(id).ok()?;
        self.nodes.get_mut(index)
    }

    pub fn ap_node(&self) -> Option<&Node> {
        self.ap_index.and_then(|i| self.nodes.get(i))
    }

    pub fn slot_usage(&self, kind: SlotUsageKind) -> &VecDeque<Vec<u64>> {
        match kind {
            SlotUsageKind::AccessPoint => &self.slot_usage_ap,
            SlotUsageKind::Station => &self.slot_usage_sta,
        }
    }

    pub fn smoothed_slot_usage(&self, kind: SlotUsageKind) -> &[f64] {
        match kind {
            SlotUsageKind::AccessPoint => &self.total_slot_usage_ap,
            SlotUsageKind::Station => &self.total_slot_usage_sta,
        }
    }

    pub fn slot_usage_timestamps(&self) -> &VecDeque<f64> {
        &self.slot_usage_timestamps
    }

    pub fn total_traffic(&self) -> u64 {
        self.total_traffic
    }

    /// Timestamp (ms) of the last event applied to this simulation
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Distance between a node and the access point
    pub fn distance_to_ap(&self, id: usize) -> Option<f64> {
        let node = self.node(id)?;
        let ap = self.ap_node()?;
        Some(node.distance_to(ap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_run_state() {
        let mut sim = Simulation::new(SimulationConfig::default());
        sim.nodes.push(Node::access_point(0, 0.0, 0.0));
        sim.ap_index = Some(0);
        sim.slot_usage_ap.push_back(vec![1, 2]);
        sim.total_slot_usage_ap = vec![1.0, 2.0];
        sim.total_traffic = 3;
        sim.current_time = 10.0;

        let config = SimulationConfig {
            name: "second".to_string(),
            ..Default::default()
        };
        sim.reset(config);

        assert!(sim.nodes().is_empty());
        assert!(sim.ap_node().is_none());
        assert!(sim.slot_usage(SlotUsageKind::AccessPoint).is_empty());
        assert!(sim.smoothed_slot_usage(SlotUsageKind::AccessPoint).is_empty());
        assert_eq!(sim.total_traffic(), 0);
        assert_eq!(sim.config.name, "second");
    }

    #[test]
    fn test_node_mut_rejects_out_of_range() {
        let mut sim = Simulation::default();
        sim.nodes.push(Node::station(0, 0.0, 0.0, 0));

        assert!(sim.node_mut(-1).is_none());
        assert!(sim.node_mut(1).is_none());
        assert!(sim.node_mut(0).is_some());
    }

    #[test]
    fn test_distance_to_ap() {
        let mut sim = Simulation::default();
        sim.nodes.push(Node::station(0, 6.0, 8.0, 0));
        assert_eq!(sim.distance_to_ap(0), None);

        sim.nodes.push(Node::access_point(1, 0.0, 0.0));
        sim.ap_index = Some(1);
        assert_eq!(sim.distance_to_ap(0), Some(10.0));
    }
}
