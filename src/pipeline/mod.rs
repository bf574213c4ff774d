//! Ingestion Pipeline
//!
//! receive → decode → enqueue → (tick) drain → apply → notify observers.
//!
//! Receipt only decodes and enqueues. Draining is the only path that mutates
//! the [`SimulationRegistry`]; it holds the registry write lock for the whole
//! cycle, so readers always see end-of-cycle state.

mod backpressure;
mod config;
mod observer;
mod queue;

pub use backpressure::{
    BackpressureController, BackpressureDecision, DEFAULT_FORCE_DRAIN_THRESHOLD,
    DEFAULT_SUPPRESS_THRESHOLD,
};
pub use config::PipelineConfig;
pub use observer::{NodeActivity, NodeAssociation, NoopObserver, PipelineObserver};
pub use queue::EventQueue;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, RwLock, RwLockReadGuard};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::decoder::decode_line;
use crate::registry::{Applied, SimulationRegistry};
use crate::types::{RawBatch, RawEntry, SimulationSnapshot, StreamSummary};

/// Outcome of one drain cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainReport {
    pub decision: BackpressureDecision,
    /// Events taken from the queue
    pub processed: usize,
    /// Events that failed to apply and were dropped
    pub failed: usize,
    /// Node activity notifications skipped by backpressure
    pub suppressed: usize,
    /// Timestamp of the last consumed event
    pub last_timestamp_ms: Option<f64>,
}

impl DrainReport {
    fn empty(decision: BackpressureDecision) -> Self {
        Self {
            decision,
            processed: 0,
            failed: 0,
            suppressed: 0,
            last_timestamp_ms: None,
        }
    }
}

/// Outcome of receiving a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub accepted: usize,
    pub rejected: usize,
    /// Queue depth after enqueueing, before any forced drain
    pub queue_depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_drain: Option<DrainReport>,
}

/// A notification collected while the write lock is held
enum Pending {
    Association(String, NodeAssociation),
    Activity(String, NodeActivity),
}

/// Orders observer dispatch by the order drains held the registry lock
///
/// Tickets are issued under the registry write lock, so no drain waits for its
/// turn while holding that lock and observers stay free to read the registry.
struct DispatchOrder {
    issued: AtomicU64,
    serving: Mutex<u64>,
    turn_over: Condvar,
}

impl DispatchOrder {
    fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            serving: Mutex::new(0),
            turn_over: Condvar::new(),
        }
    }

    /// Must be called with the registry write lock held
    fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst)
    }

    fn wait_for(&self, ticket: u64) -> DispatchTurn<'_> {
        let mut serving = self.serving.lock();
        while *serving != ticket {
            self.turn_over.wait(&mut serving);
        }
        DispatchTurn { order: self }
    }
}

/// Passes the turn on when dropped, including on observer panic
struct DispatchTurn<'a> {
    order: &'a DispatchOrder,
}

impl Drop for DispatchTurn<'_> {
    fn drop(&mut self) {
        *self.order.serving.lock() += 1;
        self.order.turn_over.notify_all();
    }
}

/// The ingestion pipeline: event queue, registry and observer wiring
pub struct IngestionPipeline {
    config: PipelineConfig,
    queue: EventQueue,
    registry: RwLock<SimulationRegistry>,
    backpressure: BackpressureController,
    observer: Arc<dyn PipelineObserver>,
    dispatch: DispatchOrder,
}

impl Default for IngestionPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl IngestionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_observer(config, Arc::new(NoopObserver))
    }

    pub fn with_observer(config: PipelineConfig, observer: Arc<dyn PipelineObserver>) -> Self {
        let registry = SimulationRegistry::new(config.history_limit)
            .with_smoothing_factor(config.smoothing_factor);
        let backpressure =
            BackpressureController::new(config.suppress_threshold, config.force_drain_threshold);

        Self {
            config,
            queue: EventQueue::new(),
            registry: RwLock::new(registry),
            backpressure,
            observer,
            dispatch: DispatchOrder::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode one line and enqueue it; malformed lines are logged and dropped
    pub fn receive_one(&self, entry: &RawEntry) -> bool {
        match decode_line(&entry.stream, &entry.line) {
            Ok(event) => {
                self.queue.enqueue(event);
                true
            }
            Err(e) => {
                warn!(stream = %entry.stream, error = %e, "dropping malformed line");
                false
            }
        }
    }

    /// Decode and enqueue a batch in order, draining immediately when the queue runs too deep
    pub fn receive_batch(&self, batch: &RawBatch) -> BatchReport {
        let mut rejected = 0;
        let events: Vec<_> = batch
            .lines
            .iter()
            .filter_map(|line| match decode_line(&batch.stream, line) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(stream = %batch.stream, error = %e, "dropping malformed line");
                    rejected += 1;
                    None
                }
            })
            .collect();

        let accepted = events.len();
        let queue_depth = self.queue.extend(events);

        let forced_drain = if self.backpressure.should_force_drain(queue_depth) {
            debug!(stream = %batch.stream, queue_depth, "queue above high-water mark, forcing drain");
            Some(self.drain(self.backpressure.decide(queue_depth)))
        } else {
            None
        };

        BatchReport {
            accepted,
            rejected,
            queue_depth,
            forced_drain,
        }
    }

    /// Periodic entry point: decide backpressure from the current depth and drain
    pub fn tick(&self) -> DrainReport {
        let decision = self.backpressure.decide(self.queue.len());
        self.drain(decision)
    }

    /// `tick` for the background driver: a panic inside the cycle is logged
    /// and the next call drains again
    pub fn guarded_tick(&self) -> Option<DrainReport> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.tick())) {
            Ok(report) => Some(report),
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(%reason, "drain cycle panicked");
                None
            }
        }
    }

    /// Apply every event queued at the start of this call, in arrival order
    pub fn drain(&self, decision: BackpressureDecision) -> DrainReport {
        let mut report = DrainReport::empty(decision);
        let mut pending = Vec::new();

        let ticket = {
            // lock before taking events so concurrent drains cannot reorder them
            let mut registry = self.registry.write();
            let events = self.queue.take_all();

            for event in events {
                report.processed += 1;
                report.last_timestamp_ms = Some(event.timestamp_ms);

                match registry.apply(&event) {
                    Ok(Applied::Quiet) => {}
                    Ok(Applied::Association(association)) => {
                        pending.push(Pending::Association(event.stream, association));
                    }
                    Ok(Applied::Activity(activity)) => {
                        if decision.notifies_node_activity() {
                            pending.push(Pending::Activity(event.stream, activity));
                        } else {
                            report.suppressed += 1;
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "failed to apply event");
                        report.failed += 1;
                    }
                }
            }

            (report.processed > 0).then(|| self.dispatch.ticket())
        };

        let Some(ticket) = ticket else {
            return report;
        };
        let turn = self.dispatch.wait_for(ticket);

        for notification in pending {
            match notification {
                Pending::Association(stream, association) => {
                    self.observer.on_node_associated(&stream, association)
                }
                Pending::Activity(stream, activity) => {
                    self.observer.on_node_activity(&stream, activity)
                }
            }
        }

        if let Some(timestamp_ms) = report.last_timestamp_ms {
            self.observer.on_simulation_time_updated(timestamp_ms);
            self.observer.update_gui(false);
        }
        drop(turn);

        if report.suppressed > 0 {
            debug!(
                suppressed = report.suppressed,
                processed = report.processed,
                "node activity notifications suppressed"
            );
        }

        report
    }

    pub fn queue_depth(&self) -> usize {
        self.queue.len()
    }

    /// Read access to end-of-cycle registry state
    pub fn registry(&self) -> RwLockReadGuard<'_, SimulationRegistry> {
        self.registry.read()
    }

    pub fn snapshot(&self, stream: &str) -> Option<SimulationSnapshot> {
        self.registry.read().snapshot(stream)
    }

    pub fn summaries(&self) -> Vec<StreamSummary> {
        self.registry.read().summaries()
    }
}
