use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::event::CrisisEvent;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OperationKind {
    /// Ordinary background sync work. Handed to the operation handler.
    #[default]
    Data,
    /// Cross-device crisis alert. Handed to the fleet propagator.
    CrisisBroadcast,
}

/// A unit of pending background sync work.
///
/// The queue never interprets `payload`; `kind` alone decides where the
/// drain loop dispatches the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SyncOperation {
    pub operation_id: String,
    pub priority: i32,
    pub kind: OperationKind,
    pub enqueued_at: jiff::Timestamp,
    pub payload: Vec<u8>,
}

impl SyncOperation {
    pub fn new(priority: i32, kind: OperationKind, payload: Vec<u8>) -> Self {
        Self {
            operation_id: Uuid::new_v4().to_string(),
            priority,
            kind,
            enqueued_at: jiff::Timestamp::now(),
            payload,
        }
    }

    pub fn data(priority: i32, payload: Vec<u8>) -> Self {
        Self::new(priority, OperationKind::Data, payload)
    }

    /// Build a broadcast of `event` at the given (preempt-tier) priority.
    pub fn crisis_broadcast(event: &CrisisEvent, priority: i32) -> Result<Self, CoreError> {
        let payload = serde_json::to_vec(event)?;
        Ok(Self::new(priority, OperationKind::CrisisBroadcast, payload))
    }

    pub fn with_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = operation_id.into();
        self
    }

    pub fn is_preempt(&self, threshold: i32) -> bool {
        self.priority >= threshold
    }

    /// Decode the crisis event carried by a broadcast operation.
    pub fn crisis_event(&self) -> Result<CrisisEvent, CoreError> {
        if self.kind != OperationKind::CrisisBroadcast {
            return Err(CoreError::NotABroadcast {
                operation_id: self.operation_id.clone(),
            });
        }
        Ok(serde_json::from_slice(&self.payload)?)
    }
}
