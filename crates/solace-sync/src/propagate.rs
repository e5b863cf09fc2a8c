use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::Instant;

use solace_audit::{EngineEvent, EventSink};
use solace_core::defaults::PROPAGATION_BUDGET_MS;
use solace_core::models::{
    CrisisEvent, DeviceRecord, PropagationReport, PropagationResult, PropagationStatus,
};

use crate::monitor::millis;
use crate::transport::DeviceTransport;

/// Fans a crisis event out to a device fleet.
///
/// Each online device gets one delivery attempt bounded by the per-device
/// budget; deliveries run concurrently. Offline devices are skipped and
/// picked up on reconnect by the registration collaborator. No retries.
#[derive(Clone)]
pub struct FleetPropagator {
    transport: Arc<dyn DeviceTransport>,
    sink: Arc<dyn EventSink>,
    budget: Duration,
}

impl FleetPropagator {
    pub fn new(transport: Arc<dyn DeviceTransport>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            transport,
            sink,
            budget: Duration::from_millis(PROPAGATION_BUDGET_MS),
        }
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Propagate with the configured per-device budget.
    pub async fn propagate(
        &self,
        source_device_id: &str,
        devices: &[DeviceRecord],
        event: &CrisisEvent,
    ) -> PropagationReport {
        self.propagate_with_budget(source_device_id, devices, event, self.budget)
            .await
    }

    /// Returns exactly one result per input device, in input order.
    /// `devices` is a snapshot; registration changes made during the call
    /// are not observed.
    #[tracing::instrument(skip_all, fields(source = %source_device_id, devices = devices.len()))]
    pub async fn propagate_with_budget(
        &self,
        source_device_id: &str,
        devices: &[DeviceRecord],
        event: &CrisisEvent,
        budget: Duration,
    ) -> PropagationReport {
        let deliveries = devices
            .iter()
            .map(|device| self.deliver_one(source_device_id, device, event, budget));
        let results = join_all(deliveries).await;

        let report = summarize(source_device_id, results, budget);
        self.sink
            .record(&EngineEvent::PropagationCompleted(report.clone()));
        report
    }

    async fn deliver_one(
        &self,
        source_device_id: &str,
        device: &DeviceRecord,
        event: &CrisisEvent,
        budget: Duration,
    ) -> PropagationResult {
        if device.device_id == source_device_id {
            return PropagationResult::source(&device.device_id);
        }
        if !device.online {
            tracing::debug!(device_id = %device.device_id, "device offline, deferring to reconnect");
            return PropagationResult::offline(&device.device_id);
        }

        let started = Instant::now();
        let delivered = tokio::time::timeout(budget, self.transport.deliver(device, event)).await;
        let elapsed = started.elapsed();
        let elapsed_ms = millis(elapsed);

        match delivered {
            Ok(Ok(())) if elapsed < budget => PropagationResult::alerted(device, elapsed_ms),
            Ok(Ok(())) | Err(_) => {
                tracing::warn!(device_id = %device.device_id, elapsed_ms, "crisis delivery timed out");
                PropagationResult::timeout(&device.device_id, elapsed_ms)
            }
            Ok(Err(e)) => {
                tracing::warn!(device_id = %device.device_id, error = %e, "crisis delivery failed");
                PropagationResult::failed(&device.device_id, elapsed_ms)
            }
        }
    }
}

/// Aggregate fleet timing. Coordination succeeds when every online
/// non-source device was alerted and the slowest of them beat the budget.
fn summarize(
    source_device_id: &str,
    results: Vec<PropagationResult>,
    budget: Duration,
) -> PropagationReport {
    let budget_ms = millis(budget);
    let attempted: Vec<&PropagationResult> = results
        .iter()
        .filter(|r| {
            matches!(
                r.status,
                PropagationStatus::Alerted | PropagationStatus::Timeout | PropagationStatus::Failed
            )
        })
        .collect();

    let count = |status: PropagationStatus| results.iter().filter(|r| r.status == status).count();
    let alerted = count(PropagationStatus::Alerted);

    let max_response_ms = attempted
        .iter()
        .map(|r| r.response_time_ms)
        .fold(0.0, f64::max);
    let mean_response_ms = if attempted.is_empty() {
        0.0
    } else {
        attempted.iter().map(|r| r.response_time_ms).sum::<f64>() / attempted.len() as f64
    };

    PropagationReport {
        source_device_id: source_device_id.to_string(),
        budget_ms,
        coordination_success: max_response_ms < budget_ms && alerted == attempted.len(),
        max_response_ms,
        mean_response_ms,
        alerted,
        timed_out: count(PropagationStatus::Timeout),
        failed: count(PropagationStatus::Failed),
        offline: count(PropagationStatus::Offline),
        resources_deployed: results.iter().filter(|r| r.resources_deployed).count(),
        results,
    }
}
