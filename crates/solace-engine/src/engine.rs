use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use solace_audit::{EngineEvent, EventSink};
use solace_core::models::{
    CrisisEvent, CrisisVerdict, DeviceRecord, OperationKind, PropagationReport, SyncOperation,
};
use solace_crisis::{Assessment, classify};
use solace_sync::{
    BoxFuture, DeviceTransport, FleetPropagator, MonitorError, ResponseMonitor, SharedSyncQueue,
    SyncQueue,
};

use crate::config::EngineConfig;
use crate::error::{CollaboratorError, EngineError};

/// Starts the user-facing intervention (emergency resources, hotline
/// screen) for a verdict. Runs under the crisis budget.
pub trait InterventionTrigger: Send + Sync {
    fn trigger(&self, verdict: CrisisVerdict) -> BoxFuture<'static, Result<(), CollaboratorError>>;
}

/// Performs ordinary (non-crisis) sync operations.
pub trait OperationHandler: Send + Sync {
    fn handle<'a>(
        &'a self,
        operation: &'a SyncOperation,
    ) -> BoxFuture<'a, Result<(), CollaboratorError>>;
}

/// External collaborators the engine calls out to.
pub struct Collaborators {
    pub sink: Arc<dyn EventSink>,
    pub transport: Arc<dyn DeviceTransport>,
    pub trigger: Arc<dyn InterventionTrigger>,
    pub handler: Arc<dyn OperationHandler>,
}

#[derive(Debug)]
pub struct AssessmentOutcome {
    pub verdict: CrisisVerdict,
    /// ID of the queued crisis broadcast, when the verdict requires one.
    pub broadcast_id: Option<String>,
    /// Outcome of the bounded intervention trigger. A timeout here does not
    /// invalidate the verdict.
    pub intervention: Option<Result<(), MonitorError>>,
}

#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Propagated(PropagationReport),
    Handled,
    HandlerFailed(String),
    /// A broadcast whose payload could not be decoded.
    Undeliverable(String),
}

#[derive(Debug, Clone)]
pub struct DispatchRecord {
    pub operation_id: String,
    pub kind: OperationKind,
    pub outcome: DispatchOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct DrainReport {
    pub dispatched: Vec<DispatchRecord>,
}

impl DrainReport {
    pub fn operation_ids(&self) -> Vec<&str> {
        self.dispatched
            .iter()
            .map(|d| d.operation_id.as_str())
            .collect()
    }

    fn push(&mut self, operation: SyncOperation, outcome: DispatchOutcome) {
        self.dispatched.push(DispatchRecord {
            operation_id: operation.operation_id,
            kind: operation.kind,
            outcome,
        });
    }

    pub fn propagations(&self) -> impl Iterator<Item = &PropagationReport> {
        self.dispatched.iter().filter_map(|d| match &d.outcome {
            DispatchOutcome::Propagated(report) => Some(report),
            _ => None,
        })
    }
}

pub struct CrisisEngine {
    config: EngineConfig,
    queue: SharedSyncQueue,
    monitor: ResponseMonitor,
    propagator: FleetPropagator,
    trigger: Arc<dyn InterventionTrigger>,
    handler: Arc<dyn OperationHandler>,
    sink: Arc<dyn EventSink>,
}

impl CrisisEngine {
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Result<Self, EngineError> {
        config.validate()?;
        let Collaborators {
            sink,
            transport,
            trigger,
            handler,
        } = collaborators;

        let queue = SharedSyncQueue::new(SyncQueue::new(config.preempt_threshold), sink.clone());
        let monitor = ResponseMonitor::new(sink.clone())
            .with_crisis_budget(config.crisis_budget())
            .with_near_budget_ratio(config.near_budget_ratio);
        let propagator =
            FleetPropagator::new(transport, sink.clone()).with_budget(config.propagation_budget());

        Ok(Self {
            config,
            queue,
            monitor,
            propagator,
            trigger,
            handler,
            sink,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn queue(&self) -> &SharedSyncQueue {
        &self.queue
    }

    /// Submit ordinary sync work.
    pub fn enqueue(&self, operation: SyncOperation) -> Result<(), EngineError> {
        Ok(self.queue.enqueue(operation)?)
    }

    /// Classify an assessment and, if it calls for intervention, queue a
    /// preempt-tier crisis broadcast and run the intervention trigger under
    /// the crisis budget.
    ///
    /// The broadcast is queued before the first suspension point, so it is
    /// ahead of all ordinary work by the time this future first yields.
    pub async fn assess(&self, assessment: &Assessment) -> Result<AssessmentOutcome, EngineError> {
        let verdict = classify(assessment)?;
        self.sink
            .record(&EngineEvent::ClassificationCompleted(verdict.clone()));

        if verdict.response_time_ms > self.config.crisis_budget_ms as f64 {
            tracing::warn!(
                assessment_id = %verdict.assessment_id,
                elapsed_ms = verdict.response_time_ms,
                budget_ms = self.config.crisis_budget_ms,
                "classification exceeded crisis budget"
            );
        }

        if !verdict.requires_intervention {
            return Ok(AssessmentOutcome {
                verdict,
                broadcast_id: None,
                intervention: None,
            });
        }

        let event = CrisisEvent::from_verdict(&verdict);
        let broadcast = SyncOperation::crisis_broadcast(&event, self.config.preempt_threshold)?;
        let broadcast_id = broadcast.operation_id.clone();
        self.queue.enqueue(broadcast)?;
        tracing::info!(
            assessment_id = %verdict.assessment_id,
            operation_id = %broadcast_id,
            severity = ?verdict.severity,
            "crisis broadcast queued"
        );

        let outcome = self
            .monitor
            .execute_crisis("trigger_intervention", self.trigger.trigger(verdict.clone()))
            .await;

        Ok(AssessmentOutcome {
            verdict,
            broadcast_id: Some(broadcast_id),
            intervention: Some(outcome.into_result()),
        })
    }

    /// Dequeue and dispatch until the queue is empty. Crisis broadcasts go
    /// to the propagator; everything else goes to the operation handler.
    /// Operations queued while draining are picked up in priority order, and
    /// a preempt-tier arrival is dispatched while an ordinary operation is
    /// still in flight. Records are in completion order.
    pub async fn drain(&self, source_device_id: &str, devices: &[DeviceRecord]) -> DrainReport {
        let mut report = DrainReport::default();
        while let Some(operation) = self.queue.dequeue() {
            let outcome = if operation.is_preempt(self.config.preempt_threshold) {
                self.dispatch(source_device_id, devices, &operation).await
            } else {
                self.dispatch_preemptible(source_device_id, devices, &operation, &mut report)
                    .await
            };
            report.push(operation, outcome);
        }
        report
    }

    /// Drain whenever the queue changes, until `shutdown` resolves.
    /// Each pass reads a fresh device snapshot from `devices`.
    pub async fn run_until(
        &self,
        source_device_id: &str,
        devices: watch::Receiver<Vec<DeviceRecord>>,
        shutdown: impl Future<Output = ()>,
    ) {
        let mut state = self.queue.subscribe();
        tokio::pin!(shutdown);

        loop {
            state.borrow_and_update();
            let snapshot = devices.borrow().clone();
            let report = self.drain(source_device_id, &snapshot).await;
            if !report.dispatched.is_empty() {
                tracing::debug!(dispatched = report.dispatched.len(), "drain pass finished");
            }

            tokio::select! {
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = &mut shutdown => break,
            }
        }
        tracing::info!("drain loop stopped");
    }

    /// Run an ordinary operation, pausing it whenever preempt-tier work
    /// reaches the front of the queue. The paused operation resumes once
    /// the preempt tier is empty.
    async fn dispatch_preemptible(
        &self,
        source_device_id: &str,
        devices: &[DeviceRecord],
        operation: &SyncOperation,
        report: &mut DrainReport,
    ) -> DispatchOutcome {
        let mut state = self.queue.subscribe();
        self.dispatch_preempt_tier(source_device_id, devices, report)
            .await;

        let mut running = self.handler.handle(operation);
        let result = loop {
            tokio::select! {
                biased;
                result = &mut running => break result,
                changed = state.changed() => {
                    if changed.is_err() {
                        break running.await;
                    }
                    self.dispatch_preempt_tier(source_device_id, devices, report)
                        .await;
                }
            }
        };
        handled_outcome(operation, result)
    }

    async fn dispatch_preempt_tier(
        &self,
        source_device_id: &str,
        devices: &[DeviceRecord],
        report: &mut DrainReport,
    ) {
        while let Some(operation) = self.queue.dequeue_preempt() {
            tracing::info!(
                operation_id = %operation.operation_id,
                "preempting in-flight sync operation"
            );
            let outcome = self.dispatch(source_device_id, devices, &operation).await;
            report.push(operation, outcome);
        }
    }

    async fn dispatch(
        &self,
        source_device_id: &str,
        devices: &[DeviceRecord],
        operation: &SyncOperation,
    ) -> DispatchOutcome {
        match operation.kind {
            OperationKind::CrisisBroadcast => match operation.crisis_event() {
                Ok(event) => DispatchOutcome::Propagated(
                    self.propagator
                        .propagate(source_device_id, devices, &event)
                        .await,
                ),
                Err(e) => {
                    tracing::error!(
                        operation_id = %operation.operation_id,
                        error = %e,
                        "undecodable crisis broadcast"
                    );
                    DispatchOutcome::Undeliverable(e.to_string())
                }
            },
            OperationKind::Data => {
                handled_outcome(operation, self.handler.handle(operation).await)
            }
        }
    }
}

fn handled_outcome(
    operation: &SyncOperation,
    result: Result<(), CollaboratorError>,
) -> DispatchOutcome {
    match result {
        Ok(()) => DispatchOutcome::Handled,
        Err(e) => {
            tracing::warn!(
                operation_id = %operation.operation_id,
                error = %e,
                "sync operation failed"
            );
            DispatchOutcome::HandlerFailed(e.to_string())
        }
    }
}
