//! Comparing one simulation against the other streams

use serde::Serialize;

use super::mean_and_std_dev;
use crate::types::{Metric, Simulation, NOT_APPLICABLE};

/// How a value relates to the average of the other streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Higher,
    Lower,
    Equal,
}

impl Comparison {
    pub fn of(value: f64, reference: f64) -> Self {
        if value > reference {
            Comparison::Higher
        } else if value < reference {
            Comparison::Lower
        } else {
            Comparison::Equal
        }
    }
}

/// Average of the per-simulation means of `metric` over every simulation but `selected`
///
/// Simulations without an applicable value are skipped; `None` when none remain.
pub fn average_of_others<'a>(
    simulations: impl IntoIterator<Item = &'a Simulation>,
    selected: &Simulation,
    metric: Metric,
) -> Option<f64> {
    let means: Vec<f64> = simulations
        .into_iter()
        .filter(|sim| !std::ptr::eq(*sim, selected))
        .filter_map(|sim| mean_and_std_dev(sim, metric).map(|s| s.mean))
        .collect();

    if means.is_empty() {
        return None;
    }
    Some(means.iter().sum::<f64>() / means.len() as f64)
}

/// Average of the same node's latest value in every simulation but `selected`
pub fn node_average_of_others<'a>(
    simulations: impl IntoIterator<Item = &'a Simulation>,
    selected: &Simulation,
    node_id: usize,
    metric: Metric,
) -> Option<f64> {
    let values: Vec<f64> = simulations
        .into_iter()
        .filter(|sim| !std::ptr::eq(*sim, selected))
        .filter_map(|sim| sim.node(node_id)?.latest().map(|v| v.get(metric)))
        .filter(|v| *v != NOT_APPLICABLE)
        .collect();

    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
