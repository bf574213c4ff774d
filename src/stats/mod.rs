//! Statistics Engine
//!
//! Pure functions over simulation state: smoothing, mean/stddev and z-scores
//! across the latest node snapshots, min/max ranges and comparisons between
//! streams.

mod compare;
mod smoothing;

pub use compare::{average_of_others, node_average_of_others, Comparison};
pub use smoothing::{accumulate_traffic, smooth, SMOOTHING_FACTOR};

use rayon::prelude::*;
use serde::Serialize;

use crate::types::{Metric, Simulation, NOT_APPLICABLE};

/// Node count above which per-metric summaries are computed in parallel
const PARALLEL_SUMMARY_THRESHOLD: usize = 256;

/// Mean and population standard deviation of a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeanStdDev {
    pub mean: f64,
    pub std_dev: f64,
    /// Nodes that contributed a value
    pub count: usize,
}

/// Range of a metric across nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

/// Per-metric statistics of one simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    pub metric: Metric,
    #[serde(flatten)]
    pub stats: MeanStdDev,
}

/// Latest value of `metric` for every node that has reported stats
fn latest_values(sim: &Simulation, metric: Metric) -> impl Iterator<Item = f64> + '_ {
    sim.nodes()
        .iter()
        .filter_map(move |n| n.latest().map(|v| v.get(metric)))
}

/// Mean and population stddev over the latest snapshots, skipping the -1 sentinel
///
/// `None` when no node has an applicable value.
pub fn mean_and_std_dev(sim: &Simulation, metric: Metric) -> Option<MeanStdDev> {
    let values: Vec<f64> = latest_values(sim, metric)
        .filter(|v| *v != NOT_APPLICABLE)
        .collect();
    mean_and_std_dev_of(&values)
}

/// Mean and population stddev of a slice
pub fn mean_and_std_dev_of(values: &[f64]) -> Option<MeanStdDev> {
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    Some(MeanStdDev {
        mean,
        std_dev: variance.sqrt(),
        count,
    })
}

/// `(value - mean) / stddev`, defined as 0 when stddev is 0
pub fn z_score(value: f64, stats: &MeanStdDev) -> f64 {
    if stats.std_dev == 0.0 {
        return 0.0;
    }
    (value - stats.mean) / stats.std_dev
}

/// Z-score of a node's latest value against all nodes of its simulation
pub fn node_z_score(sim: &Simulation, node_id: usize, metric: Metric) -> Option<f64> {
    let value = sim.node(node_id)?.latest()?.get(metric);
    let stats = mean_and_std_dev(sim, metric)?;
    Some(z_score(value, &stats))
}

/// Map a z-score onto `[0, 1]` for heat coloring; two stddevs saturate
pub fn z_heat(z: f64) -> f64 {
    let alpha = (z / 2.0).clamp(-1.0, 1.0);
    (alpha + 1.0) / 2.0
}

/// Min and max of a metric across nodes
///
/// With `deltas`, nodes with at least two snapshots contribute the change
/// between them; other nodes contribute their latest value.
pub fn min_max(sim: &Simulation, metric: Metric, deltas: bool) -> Option<MinMax> {
    sim.nodes()
        .iter()
        .filter_map(|n| {
            if deltas {
                n.latest_delta(metric)
                    .or_else(|| n.latest().map(|v| v.get(metric)))
            } else {
                n.latest().map(|v| v.get(metric))
            }
        })
        .fold(None, |range: Option<MinMax>, v| {
            Some(match range {
                Some(r) => MinMax {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
                None => MinMax { min: v, max: v },
            })
        })
}

/// Bytes per second of simulated time, 0 before any time has elapsed
pub fn throughput(sim: &Simulation) -> f64 {
    let elapsed_ms = sim.current_time();
    if elapsed_ms <= 0.0 {
        return 0.0;
    }
    sim.total_traffic() as f64 / elapsed_ms * 1000.0
}

/// Mean and stddev of every metric that has at least one applicable value
pub fn summarize(sim: &Simulation) -> Vec<MetricSummary> {
    let summarize_one = |metric: &Metric| {
        mean_and_std_dev(sim, *metric).map(|stats| MetricSummary {
            metric: *metric,
            stats,
        })
    };

    if sim.nodes().len() > PARALLEL_SUMMARY_THRESHOLD {
        Metric::ALL.par_iter().filter_map(summarize_one).collect()
    } else {
        Metric::ALL.iter().filter_map(summarize_one).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{Node, NodeValue};

    pub(crate) fn value(transmit_time: f64, rto: i64) -> NodeValue {
        NodeValue {
            total_transmit_time: transmit_time,
            tcp_rto: rto,
            ..Default::default()
        }
    }

    /// Simulation with one station per entry, each holding the given snapshots
    pub(crate) fn simulation_with(histories: &[&[f64]]) -> Simulation {
        let mut sim = Simulation::default();
        for (id, history) in histories.iter().enumerate() {
            let mut node = Node::station(id, id as f64, 0.0, id as i64);
            for t in history.iter() {
                node.push_value(value(*t, 0), 16);
            }
            sim.nodes.push(node);
        }
        sim
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mean_and_population_std_dev() {
        let sim = simulation_with(&[&[10.0], &[20.0], &[30.0]]);
        let stats = mean_and_std_dev(&sim, Metric::TotalTransmitTime).unwrap();

        assert!(approx_eq(stats.mean, 20.0));
        assert!(approx_eq(stats.std_dev, (200.0f64 / 3.0).sqrt()));
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_only_latest_snapshot_counts() {
        let sim = simulation_with(&[&[500.0, 10.0], &[20.0], &[-3.0, 30.0]]);
        let stats = mean_and_std_dev(&sim, Metric::TotalTransmitTime).unwrap();
        assert!(approx_eq(stats.mean, 20.0));
    }

    #[test]
    fn test_sentinel_excluded() {
        let sim = simulation_with(&[&[10.0], &[-1.0], &[30.0], &[]]);
        let stats = mean_and_std_dev(&sim, Metric::TotalTransmitTime).unwrap();

        assert_eq!(stats.count, 2);
        assert!(approx_eq(stats.mean, 20.0));
        assert!(approx_eq(stats.std_dev, 10.0));
    }

    #[test]
    fn test_no_applicable_values() {
        let sim = simulation_with(&[&[-1.0], &[]]);
        assert_eq!(mean_and_std_dev(&sim, Metric::TotalTransmitTime), None);
        assert_eq!(mean_and_std_dev(&Simulation::default(), Metric::TcpRto), None);
    }

    #[test]
    fn test_z_score_zero_when_all_equal() {
        let sim = simulation_with(&[&[7.0], &[7.0], &[7.0]]);
        let z = node_z_score(&sim, 1, Metric::TotalTransmitTime).unwrap();
        assert_eq!(z, 0.0);
        assert!(z.is_finite());
    }

    #[test]
    fn test_z_score() {
        let stats = MeanStdDev {
            mean: 20.0,
            std_dev: 5.0,
            count: 4,
        };
        assert_eq!(z_score(30.0, &stats), 2.0);
        assert_eq!(z_score(15.0, &stats), -1.0);
    }

    #[test]
    fn test_z_heat_range() {
        assert_eq!(z_heat(0.0), 0.5);
        assert_eq!(z_heat(2.0), 1.0);
        assert_eq!(z_heat(10.0), 1.0);
        assert_eq!(z_heat(-4.0), 0.0);
        assert_eq!(z_heat(1.0), 0.75);
    }

    #[test]
    fn test_min_max_latest_and_deltas() {
        let sim = simulation_with(&[&[1.0, 5.0], &[2.0, 20.0], &[8.0]]);

        let range = min_max(&sim, Metric::TotalTransmitTime, false).unwrap();
        assert_eq!(range, MinMax { min: 5.0, max: 20.0 });

        let range = min_max(&sim, Metric::TotalTransmitTime, true).unwrap();
        assert_eq!(range, MinMax { min: 4.0, max: 18.0 });

        assert_eq!(min_max(&Simulation::default(), Metric::TcpRto, false), None);
    }

    #[test]
    fn test_throughput() {
        let mut sim = Simulation::default();
        assert_eq!(throughput(&sim), 0.0);

        sim.total_traffic = 500;
        sim.current_time = 2000.0;
        assert_eq!(throughput(&sim), 250.0);
    }

    #[test]
    fn test_summarize_skips_metrics_without_values() {
        let sim = simulation_with(&[&[10.0], &[30.0]]);
        let summaries = summarize(&sim);

        assert_eq!(summaries.len(), Metric::ALL.len());
        let transmit = summaries
            .iter()
            .find(|s| s.metric == Metric::TotalTransmitTime)
            .unwrap();
        assert!(approx_eq(transmit.stats.mean, 20.0));

        assert!(summarize(&Simulation::default()).is_empty());
    }
}
