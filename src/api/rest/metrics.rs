//! Metric endpoint - one counter across the nodes of a stream

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{stream_not_found, ApiError, ApiResponse};
use crate::api::websocket::state::AppState;
use crate::stats::{self, Comparison, MeanStdDev, MinMax};
use crate::types::{Metric, NOT_APPLICABLE};

/// Query parameters for the metric endpoint
#[derive(Debug, Deserialize)]
pub struct MetricParams {
    /// Range over the change between the last two snapshots instead of latest values
    #[serde(default)]
    pub deltas: bool,
}

/// One node's view of the metric
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetric {
    pub id: usize,
    pub value: f64,
    /// Absent when the node reports the not-applicable sentinel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_score: Option<f64>,
    /// Z-score mapped onto [0, 1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_of_others: Option<f64>,
}

/// Response for GET /api/streams/:stream/metrics/:metric
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDetail {
    pub metric: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MeanStdDev>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<MinMax>,
    /// Mean of the other streams' means
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_of_others: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
    pub nodes: Vec<NodeMetric>,
}

/// GET /api/streams/:stream/metrics/:metric
pub async fn get_metric(
    State(state): State<Arc<AppState>>,
    Path((stream, metric_name)): Path<(String, String)>,
    Query(params): Query<MetricParams>,
) -> impl IntoResponse {
    let Some(metric) = Metric::from_name(&metric_name) else {
        return ApiError::bad_request(format!("Unknown metric '{}'", metric_name)).into_response();
    };

    let sequence_id = state.current_sequence_id();
    let registry = state.pipeline.registry();
    let Some(sim) = registry.get(&stream) else {
        return stream_not_found(&stream).into_response();
    };

    let mean_std = stats::mean_and_std_dev(sim, metric);
    let average_of_others = stats::average_of_others(registry.simulations(), sim, metric);
    let comparison = match (mean_std, average_of_others) {
        (Some(own), Some(others)) => Some(Comparison::of(own.mean, others)),
        _ => None,
    };

    let nodes = sim
        .nodes()
        .iter()
        .filter_map(|node| {
            let value = node.latest()?.get(metric);
            let z_score = (value != NOT_APPLICABLE)
                .then(|| mean_std.map_or(0.0, |s| stats::z_score(value, &s)));
            Some(NodeMetric {
                id: node.id,
                value,
                z_score,
                heat: z_score.map(stats::z_heat),
                average_of_others: stats::node_average_of_others(
                    registry.simulations(),
                    sim,
                    node.id,
                    metric,
                ),
            })
        })
        .collect();

    let detail = MetricDetail {
        metric,
        stats: mean_std,
        range: stats::min_max(sim, metric, params.deltas),
        average_of_others,
        comparison,
        nodes,
    };

    Json(ApiResponse::new(detail, sequence_id)).into_response()
}
