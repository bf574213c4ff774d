//! Stream endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::{stream_not_found, ApiResponse};
use crate::api::websocket::state::AppState;
use crate::stats::{self, MetricSummary};
use crate::types::SimulationSnapshot;

/// Response for GET /api/streams/:stream
#[derive(Debug, Serialize)]
pub struct StreamDetail {
    #[serde(flatten)]
    pub snapshot: SimulationSnapshot,
    pub metrics: Vec<MetricSummary>,
}

/// GET /api/streams - Summaries of every stream in start order
pub async fn list_streams(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sequence_id = state.current_sequence_id();
    let summaries = state.pipeline.summaries();
    let total = summaries.len();

    Json(ApiResponse::with_total(summaries, sequence_id, total))
}

/// GET /api/streams/:stream - Snapshot of one simulation
pub async fn get_stream(
    State(state): State<Arc<AppState>>,
    Path(stream): Path<String>,
) -> impl IntoResponse {
    let sequence_id = state.current_sequence_id();
    let registry = state.pipeline.registry();

    match registry.get(&stream) {
        Some(sim) => {
            let detail = StreamDetail {
                snapshot: SimulationSnapshot::capture(&stream, sim),
                metrics: stats::summarize(sim),
            };
            Json(ApiResponse::new(detail, sequence_id)).into_response()
        }
        None => stream_not_found(&stream).into_response(),
    }
}
