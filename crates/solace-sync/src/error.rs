use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    /// The action did not settle within budget. Its eventual result is
    /// discarded.
    #[error("{action} exceeded its {budget_ms}ms budget")]
    TimeoutExceeded {
        action: String,
        budget_ms: f64,
        elapsed_ms: f64,
    },

    #[error("{action} failed after {elapsed_ms:.1}ms: {message}")]
    ActionFailed {
        action: String,
        message: String,
        elapsed_ms: f64,
    },
}

impl MonitorError {
    /// Stable tag reported to metrics collaborators.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TimeoutExceeded { .. } => "timeout_exceeded",
            Self::ActionFailed { .. } => "action_failed",
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        match self {
            Self::TimeoutExceeded { elapsed_ms, .. } | Self::ActionFailed { elapsed_ms, .. } => {
                *elapsed_ms
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutExceeded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("invalid priority {priority} for operation {operation_id}")]
    InvalidPriority { operation_id: String, priority: i32 },

    #[error("operation {0} is already queued")]
    DuplicateOperation(String),
}

/// Transport-level delivery failure for a single device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("device {device_id} rejected delivery: {message}")]
    Rejected { device_id: String, message: String },

    #[error("device {device_id} is unreachable")]
    Unreachable { device_id: String },
}
