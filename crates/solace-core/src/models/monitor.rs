use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One response-monitor invocation, as reported to metrics collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonitorRecord {
    pub action: String,
    pub success: bool,
    /// `timeout_exceeded` or `action_failed` when `success` is false.
    pub reason: Option<String>,
    pub response_time_ms: f64,
    pub budget_ms: f64,
    /// Succeeded, but close enough to the budget to be worth trending.
    pub near_budget: bool,
}
