use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::device::PropagationResult;

/// Fleet-wide outcome of one crisis propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PropagationReport {
    pub source_device_id: String,
    pub results: Vec<PropagationResult>,
    pub budget_ms: f64,
    /// Every online non-source device was alerted within budget.
    pub coordination_success: bool,
    pub max_response_ms: f64,
    pub mean_response_ms: f64,
    pub alerted: usize,
    pub timed_out: usize,
    pub failed: usize,
    pub offline: usize,
    pub resources_deployed: usize,
}

/// Queue state published after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QueueSnapshot {
    pub size: usize,
    pub front: Option<String>,
}
