//! Immutable views of registry state handed to observers and the HTTP API

use serde::Serialize;

use super::config::SimulationConfig;
use super::event::SlotUsageKind;
use super::node::{Node, NodeKind, NodeValue};
use super::simulation::Simulation;
use crate::stats;

/// A node with its most recent stats update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: usize,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub group_number: i64,
    pub raw_slot_index: i64,
    pub association_id: i64,
    pub value_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<NodeValue>,
}

impl From<&Node> for NodeSnapshot {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            kind: node.kind,
            x: node.x,
            y: node.y,
            group_number: node.group_number,
            raw_slot_index: node.raw_slot_index,
            association_id: node.association_id,
            value_count: node.value_count(),
            latest: node.latest().cloned(),
        }
    }
}

/// Point-in-time copy of a simulation, taken between drain cycles
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSnapshot {
    pub stream: String,
    pub config: SimulationConfig,
    pub nodes: Vec<NodeSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_node: Option<usize>,
    pub total_slot_usage_ap: Vec<f64>,
    pub total_slot_usage_sta: Vec<f64>,
    pub slot_sample_count: usize,
    pub total_traffic: u64,
    /// Bytes per second of simulated time
    pub throughput: f64,
    pub current_time: f64,
}

impl SimulationSnapshot {
    pub fn capture(stream: &str, sim: &Simulation) -> Self {
        Self {
            stream: stream.to_string(),
            config: sim.config.clone(),
            nodes: sim.nodes().iter().map(NodeSnapshot::from).collect(),
            ap_node: sim.ap_node().map(|n| n.id),
            total_slot_usage_ap: sim.smoothed_slot_usage(SlotUsageKind::AccessPoint).to_vec(),
            total_slot_usage_sta: sim.smoothed_slot_usage(SlotUsageKind::Station).to_vec(),
            slot_sample_count: sim.slot_usage(SlotUsageKind::AccessPoint).len(),
            total_traffic: sim.total_traffic(),
            throughput: stats::throughput(sim),
            current_time: sim.current_time(),
        }
    }
}

/// One-line overview of a stream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSummary {
    pub stream: String,
    pub name: String,
    pub node_count: usize,
    pub associated_count: usize,
    pub total_traffic: u64,
    pub current_time: f64,
}

impl StreamSummary {
    pub fn capture(stream: &str, sim: &Simulation) -> Self {
        Self {
            stream: stream.to_string(),
            name: sim.config.name.clone(),
            node_count: sim.nodes().len(),
            associated_count: sim.nodes().iter().filter(|n| n.is_associated()).count(),
            total_traffic: sim.total_traffic(),
            current_time: sim.current_time(),
        }
    }
}
