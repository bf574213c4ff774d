//! Node endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{stream_not_found, ApiError, ApiResponse};
use crate::api::websocket::state::AppState;
use crate::types::{NodeSnapshot, NodeValue};

/// Query parameters for the node endpoint
#[derive(Debug, Deserialize)]
pub struct NodeParams {
    /// Number of most recent snapshots to return (default: 100)
    #[serde(default = "default_history")]
    pub history: usize,
}

fn default_history() -> usize {
    100
}

/// Response for GET /api/streams/:stream/nodes/:id
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetail {
    #[serde(flatten)]
    pub node: NodeSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_to_ap: Option<f64>,
    /// Most recent snapshots, oldest first
    pub history: Vec<NodeValue>,
}

/// GET /api/streams/:stream/nodes/:id
pub async fn get_node(
    State(state): State<Arc<AppState>>,
    Path((stream, id)): Path<(String, usize)>,
    Query(params): Query<NodeParams>,
) -> impl IntoResponse {
    let sequence_id = state.current_sequence_id();
    let registry = state.pipeline.registry();

    let Some(sim) = registry.get(&stream) else {
        return stream_not_found(&stream).into_response();
    };
    let Some(node) = sim.node(id) else {
        return ApiError::not_found(format!("Node {} not found in stream '{}'", id, stream))
            .into_response();
    };

    let skip = node.value_count().saturating_sub(params.history.min(1000));
    let detail = NodeDetail {
        node: NodeSnapshot::from(node),
        distance_to_ap: sim.distance_to_ap(id),
        history: node.values().skip(skip).cloned().collect(),
    };

    Json(ApiResponse::new(detail, sequence_id)).into_response()
}
