use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::severity::{InterventionType, Severity};
use super::verdict::{CrisisReason, CrisisVerdict};

/// The crisis alert fanned out to a user's other devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CrisisEvent {
    pub event_id: Uuid,
    pub assessment_id: Uuid,
    pub severity: Severity,
    pub intervention_type: InterventionType,
    pub reasons: BTreeSet<CrisisReason>,
    pub raised_at: jiff::Timestamp,
}

impl CrisisEvent {
    pub fn from_verdict(verdict: &CrisisVerdict) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            assessment_id: verdict.assessment_id,
            severity: verdict.severity,
            intervention_type: verdict.intervention_type,
            reasons: verdict.reasons.clone(),
            raised_at: jiff::Timestamp::now(),
        }
    }
}
