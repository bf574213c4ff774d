//! Per-tag state transitions

use tracing::{debug, info, warn};

use super::{NodeActivity, NodeAssociation, SimulationRegistry};
use crate::stats::{accumulate_traffic, smooth};
use crate::types::{
    AccessPointAdded, Metric, Node, NodeStatsRecord, Simulation, SimulationConfig,
    SlotUsageKind, StationAdded, StationAssociated,
};

/// Create the simulation for `stream`, or reset it in place on a restart
pub(crate) fn start(
    registry: &mut SimulationRegistry,
    stream: &str,
    timestamp_ms: f64,
    config: &SimulationConfig,
) {
    match registry.simulations.get_mut(stream) {
        Some(sim) => {
            info!(stream, name = %config.name, "simulation restarted");
            sim.reset(config.clone());
            sim.current_time = timestamp_ms;
        }
        None => {
            info!(stream, name = %config.name, "simulation started");
            let mut sim = Simulation::new(config.clone());
            sim.current_time = timestamp_ms;
            registry.simulations.insert(stream.to_string(), sim);
            registry.order.push(stream.to_string());
        }
    }
}

pub(crate) fn station_added(sim: &mut Simulation, stream: &str, added: &StationAdded) {
    let id = sim.nodes.len();
    if usize::try_from(added.id).ok() != Some(id) {
        warn!(
            stream,
            declared = added.id,
            assigned = id,
            "station id does not match its position, using position"
        );
    }
    sim.nodes
        .push(Node::station(id, added.x, added.y, added.association_id));
}

/// Add the access point, or move it when one already exists
pub(crate) fn access_point_added(sim: &mut Simulation, added: &AccessPointAdded) {
    if let Some(ap) = sim.ap_index.and_then(|i| sim.nodes.get_mut(i)) {
        ap.x = added.x;
        ap.y = added.y;
        return;
    }

    let id = sim.nodes.len();
    sim.nodes.push(Node::access_point(id, added.x, added.y));
    sim.ap_index = Some(id);
}

pub(crate) fn station_associated(
    sim: &mut Simulation,
    assoc: &StationAssociated,
) -> Option<NodeAssociation> {
    let node = station_mut(sim, assoc.id)?;
    node.set_associated(true);
    node.association_id = assoc.association_id;
    node.group_number = assoc.group_number;
    node.raw_slot_index = assoc.raw_slot_index;
    Some(association_of(node))
}

pub(crate) fn station_deassociated(sim: &mut Simulation, id: i64) -> Option<NodeAssociation> {
    let node = station_mut(sim, id)?;
    node.set_associated(false);
    Some(association_of(node))
}

pub(crate) fn node_stats(
    sim: &mut Simulation,
    stats: &NodeStatsRecord,
    history_limit: usize,
) -> Option<NodeActivity> {
    let Some(node) = sim.node_mut(stats.id) else {
        debug!(id = stats.id, "node stats for unknown node ignored");
        return None;
    };

    node.push_value(stats.value.clone(), history_limit);
    Some(NodeActivity {
        node_id: node.id,
        x: node.x,
        y: node.y,
        transmitted: node.has_increased(Metric::TotalTransmitTime),
    })
}

pub(crate) fn slot_stats(
    sim: &mut Simulation,
    kind: SlotUsageKind,
    values: &[u64],
    timestamp_ms: f64,
    history_limit: usize,
    alpha: f64,
) {
    if let Some(expected) = sim.config.expected_slot_count() {
        if expected != values.len() {
            debug!(
                kind = ?kind,
                expected,
                actual = values.len(),
                "slot usage length does not match raw geometry"
            );
        }
    }

    accumulate_traffic(&mut sim.total_traffic, values);

    let (samples, smoothed) = match kind {
        SlotUsageKind::AccessPoint => {
            push_bounded(&mut sim.slot_usage_timestamps, timestamp_ms, history_limit);
            (&mut sim.slot_usage_ap, &mut sim.total_slot_usage_ap)
        }
        SlotUsageKind::Station => (&mut sim.slot_usage_sta, &mut sim.total_slot_usage_sta),
    };
    push_bounded(samples, values.to_vec(), history_limit);
    smooth(smoothed, values, alpha);
}

/// Resolve a station for an association event; out-of-range ids and the AP are skipped
fn station_mut(sim: &mut Simulation, id: i64) -> Option<&mut Node> {
    let Some(node) = sim.node_mut(id) else {
        debug!(id, "association event for unknown node ignored");
        return None;
    };
    if node.is_access_point() {
        debug!(id, "association event for access point ignored");
        return None;
    }
    Some(node)
}

fn association_of(node: &Node) -> NodeAssociation {
    NodeAssociation {
        node_id: node.id,
        x: node.x,
        y: node.y,
        associated: node.is_associated(),
    }
}

fn push_bounded<T>(buffer: &mut std::collections::VecDeque<T>, item: T, limit: usize) {
    buffer.push_back(item);
    while buffer.len() > limit.max(1) {
        buffer.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[test]
    fn test_push_bounded() {
        let mut buffer = VecDeque::new();
        for i in 0..5 {
            push_bounded(&mut buffer, i, 2);
        }
        assert_eq!(buffer, VecDeque::from(vec![3, 4]));
    }

    #[test]
    fn test_mismatched_station_id_uses_position() {
        let mut sim = Simulation::default();
        let added = StationAdded {
            id: 9,
            x: 1.0,
            y: 2.0,
            association_id: 3,
        };
        station_added(&mut sim, "a", &added);

        let node = sim.node(0).unwrap();
        assert_eq!(node.id, 0);
        assert_eq!(node.association_id, 3);
    }

    #[test]
    fn test_association_on_access_point_ignored() {
        let mut sim = Simulation::default();
        access_point_added(&mut sim, &AccessPointAdded { x: 0.0, y: 0.0 });

        let assoc = StationAssociated {
            id: 0,
            association_id: 1,
            group_number: 0,
            raw_slot_index: 0,
        };
        assert_eq!(station_associated(&mut sim, &assoc), None);
        assert!(sim.node(0).unwrap().is_access_point());
    }

    #[test]
    fn test_slot_history_bounded() {
        let mut sim = Simulation::default();
        for i in 0..6u64 {
            slot_stats(&mut sim, SlotUsageKind::AccessPoint, &[i], i as f64, 4, 0.8);
        }
        assert_eq!(sim.slot_usage(SlotUsageKind::AccessPoint).len(), 4);
        assert_eq!(sim.slot_usage_timestamps().len(), 4);
        assert_eq!(sim.slot_usage_timestamps().front(), Some(&2.0));
        assert_eq!(sim.total_traffic(), 15);
    }
}
