use serde::Serialize;
use tracing::{info, warn};

use solace_core::models::{CrisisVerdict, MonitorRecord, PropagationReport, QueueSnapshot};

use crate::error::AuditError;

/// A structured event emitted by the crisis engine.
///
/// Serialized with an `event` tag so consumers reading the JSON stream can
/// dispatch without knowing the payload shape up front.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum EngineEvent {
    ClassificationCompleted(CrisisVerdict),
    MonitorOutcome(MonitorRecord),
    QueueStateChanged(QueueSnapshot),
    PropagationCompleted(PropagationReport),
}

impl EngineEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::ClassificationCompleted(_) => "classification_completed",
            EngineEvent::MonitorOutcome(_) => "monitor_outcome",
            EngineEvent::QueueStateChanged(_) => "queue_state_changed",
            EngineEvent::PropagationCompleted(_) => "propagation_completed",
        }
    }

    pub fn to_json(&self) -> Result<String, AuditError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Emit this event via tracing. Timeouts and failed fleet coordination
    /// are logged at warn.
    pub fn emit(&self) {
        match self {
            EngineEvent::ClassificationCompleted(verdict) => info!(
                event.kind = self.kind(),
                assessment_id = %verdict.assessment_id,
                severity = ?verdict.severity,
                requires_intervention = verdict.requires_intervention,
                status = ?verdict.status,
                reasons = ?verdict.reason_tags(),
                elapsed_ms = verdict.response_time_ms,
                "classification completed"
            ),
            EngineEvent::MonitorOutcome(record) if !record.success => warn!(
                event.kind = self.kind(),
                action = %record.action,
                reason = record.reason.as_deref().unwrap_or("unknown"),
                elapsed_ms = record.response_time_ms,
                budget_ms = record.budget_ms,
                "bounded action did not succeed"
            ),
            EngineEvent::MonitorOutcome(record) => info!(
                event.kind = self.kind(),
                action = %record.action,
                elapsed_ms = record.response_time_ms,
                budget_ms = record.budget_ms,
                near_budget = record.near_budget,
                "bounded action succeeded"
            ),
            EngineEvent::QueueStateChanged(snapshot) => info!(
                event.kind = self.kind(),
                size = snapshot.size,
                front = snapshot.front.as_deref().unwrap_or("-"),
                "queue state changed"
            ),
            EngineEvent::PropagationCompleted(report) if !report.coordination_success => warn!(
                event.kind = self.kind(),
                source = %report.source_device_id,
                alerted = report.alerted,
                timed_out = report.timed_out,
                failed = report.failed,
                offline = report.offline,
                max_response_ms = report.max_response_ms,
                "crisis propagation incomplete"
            ),
            EngineEvent::PropagationCompleted(report) => info!(
                event.kind = self.kind(),
                source = %report.source_device_id,
                alerted = report.alerted,
                offline = report.offline,
                max_response_ms = report.max_response_ms,
                "crisis propagation completed"
            ),
        }
    }
}
