use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A device registered to the user. Owned by the registration collaborator;
/// read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeviceRecord {
    pub device_id: String,
    pub online: bool,
    /// Whether the device can render emergency resources.
    pub crisis_capable: bool,
}

impl DeviceRecord {
    pub fn new(device_id: impl Into<String>, online: bool, crisis_capable: bool) -> Self {
        Self {
            device_id: device_id.into(),
            online,
            crisis_capable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PropagationStatus {
    Source,
    Offline,
    Alerted,
    Timeout,
    /// The transport reported an error before the budget elapsed.
    Failed,
}

/// Outcome of delivering a crisis event to one device.
///
/// Build through the constructors, which uphold
/// `resources_deployed ⇒ status == Alerted ∧ device.crisis_capable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PropagationResult {
    pub device_id: String,
    pub status: PropagationStatus,
    pub response_time_ms: f64,
    pub resources_deployed: bool,
}

impl PropagationResult {
    pub fn source(device_id: impl Into<String>) -> Self {
        Self::without_resources(device_id, PropagationStatus::Source, 0.0)
    }

    pub fn offline(device_id: impl Into<String>) -> Self {
        Self::without_resources(device_id, PropagationStatus::Offline, 0.0)
    }

    pub fn alerted(device: &DeviceRecord, response_time_ms: f64) -> Self {
        Self {
            device_id: device.device_id.clone(),
            status: PropagationStatus::Alerted,
            response_time_ms,
            resources_deployed: device.crisis_capable,
        }
    }

    pub fn timeout(device_id: impl Into<String>, response_time_ms: f64) -> Self {
        Self::without_resources(device_id, PropagationStatus::Timeout, response_time_ms)
    }

    pub fn failed(device_id: impl Into<String>, response_time_ms: f64) -> Self {
        Self::without_resources(device_id, PropagationStatus::Failed, response_time_ms)
    }

    fn without_resources(
        device_id: impl Into<String>,
        status: PropagationStatus,
        response_time_ms: f64,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            status,
            response_time_ms,
            resources_deployed: false,
        }
    }
}
