//! Queue-depth based backpressure

use serde::Serialize;

/// Depth above which per-node observer callbacks are suppressed
pub const DEFAULT_SUPPRESS_THRESHOLD: usize = 1_000;

/// Depth above which a batch receipt drains immediately
pub const DEFAULT_FORCE_DRAIN_THRESHOLD: usize = 10_000;

/// What observers receive during one drain cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum BackpressureDecision {
    /// Every applied event is reported
    Notify,
    /// Node activity callbacks are skipped; state and the summary still update
    Suppress { queue_depth: usize },
}

impl BackpressureDecision {
    pub fn notifies_node_activity(&self) -> bool {
        matches!(self, BackpressureDecision::Notify)
    }
}

/// Decides per drain cycle how much to tell observers, and when to drain early
#[derive(Debug, Clone, Copy)]
pub struct BackpressureController {
    suppress_threshold: usize,
    force_drain_threshold: usize,
}

impl Default for BackpressureController {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPRESS_THRESHOLD, DEFAULT_FORCE_DRAIN_THRESHOLD)
    }
}

impl BackpressureController {
    pub fn new(suppress_threshold: usize, force_drain_threshold: usize) -> Self {
        Self {
            suppress_threshold,
            force_drain_threshold,
        }
    }

    /// Decision for a drain starting at `queue_depth`
    pub fn decide(&self, queue_depth: usize) -> BackpressureDecision {
        if queue_depth > self.suppress_threshold {
            BackpressureDecision::Suppress { queue_depth }
        } else {
            BackpressureDecision::Notify
        }
    }

    /// Whether a batch that left the queue at `queue_depth` must drain now
    pub fn should_force_drain(&self, queue_depth: usize) -> bool {
        queue_depth > self.force_drain_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_thresholds() {
        let controller = BackpressureController::default();

        assert_eq!(controller.decide(0), BackpressureDecision::Notify);
        assert_eq!(controller.decide(1_000), BackpressureDecision::Notify);
        assert_eq!(
            controller.decide(1_001),
            BackpressureDecision::Suppress { queue_depth: 1_001 }
        );
        assert!(!controller.decide(5_000).notifies_node_activity());
    }

    #[test]
    fn test_force_drain_threshold() {
        let controller = BackpressureController::default();

        assert!(!controller.should_force_drain(10_000));
        assert!(controller.should_force_drain(10_001));
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(BackpressureDecision::Suppress { queue_depth: 7 }).unwrap();
        assert_eq!(json["decision"], "suppress");
        assert_eq!(json["queue_depth"], 7);
    }
}
