//! Shared application state

use std::sync::Arc;
use tokio::sync::broadcast;

use super::broadcaster::EventBroadcaster;
use super::events::WsMessage;
use crate::config::ServerConfig;
use crate::pipeline::{IngestionPipeline, PipelineConfig};

/// State shared by the HTTP routes, WebSocket connections and the tick task
pub struct AppState {
    pub pipeline: Arc<IngestionPipeline>,

    /// Also the pipeline's observer
    pub broadcaster: Arc<EventBroadcaster>,
}

impl AppState {
    /// Build a pipeline whose observer broadcasts to WebSocket clients
    pub fn new(pipeline_config: PipelineConfig, broadcast_capacity: usize) -> Self {
        let broadcaster = Arc::new(EventBroadcaster::new(broadcast_capacity));
        let pipeline = Arc::new(IngestionPipeline::with_observer(
            pipeline_config,
            broadcaster.clone(),
        ));
        Self {
            pipeline,
            broadcaster,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.pipeline.clone(), config.broadcast_capacity)
    }

    pub fn current_sequence_id(&self) -> u64 {
        self.broadcaster.current_sequence_id()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.broadcaster.subscribe()
    }
}
