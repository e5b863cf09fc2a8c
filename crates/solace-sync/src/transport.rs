use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use solace_core::models::{CrisisEvent, DeviceRecord};

use crate::error::DeliveryError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Delivers a crisis event to one device. Resolves once the device has
/// acknowledged the alert.
pub trait DeviceTransport: Send + Sync {
    fn deliver<'a>(
        &'a self,
        device: &'a DeviceRecord,
        event: &'a CrisisEvent,
    ) -> BoxFuture<'a, Result<(), DeliveryError>>;
}

/// Transport with configurable per-device latency and failures, for
/// rehearsing fleet behaviour without real devices.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTransport {
    default_latency: Duration,
    latencies: HashMap<String, Duration>,
    rejecting: HashSet<String>,
    unreachable: HashSet<String>,
}

impl SimulatedTransport {
    pub fn new(default_latency: Duration) -> Self {
        Self {
            default_latency,
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, device_id: impl Into<String>, latency: Duration) -> Self {
        self.latencies.insert(device_id.into(), latency);
        self
    }

    /// Make delivery to `device_id` fail after its latency elapses.
    pub fn with_rejection(mut self, device_id: impl Into<String>) -> Self {
        self.rejecting.insert(device_id.into());
        self
    }

    /// Make delivery to `device_id` fail immediately, as if the fleet
    /// record still lists it online but its link is down.
    pub fn with_unreachable(mut self, device_id: impl Into<String>) -> Self {
        self.unreachable.insert(device_id.into());
        self
    }

    fn latency_for(&self, device_id: &str) -> Duration {
        self.latencies
            .get(device_id)
            .copied()
            .unwrap_or(self.default_latency)
    }
}

impl DeviceTransport for SimulatedTransport {
    fn deliver<'a>(
        &'a self,
        device: &'a DeviceRecord,
        _event: &'a CrisisEvent,
    ) -> BoxFuture<'a, Result<(), DeliveryError>> {
        Box::pin(async move {
            if self.unreachable.contains(&device.device_id) {
                return Err(DeliveryError::Unreachable {
                    device_id: device.device_id.clone(),
                });
            }
            tokio::time::sleep(self.latency_for(&device.device_id)).await;
            if self.rejecting.contains(&device.device_id) {
                return Err(DeliveryError::Rejected {
                    device_id: device.device_id.clone(),
                    message: "simulated rejection".to_string(),
                });
            }
            Ok(())
        })
    }
}
