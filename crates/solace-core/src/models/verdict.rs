use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::severity::{InterventionType, Severity, SeverityBand};

/// Why a verdict was raised. Serialized as the stable snake_case tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CrisisReason {
    SuicidalIdeationDetected,
    FrequentSuicidalThoughts,
    SevereDepressionScore,
    ModeratelySevereWithRiskFactors,
    SevereAnxietyScore,
    ModerateAnxietyWithPanicIndicators,
    SelfHarmItemUnanswered,
}

impl CrisisReason {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::SuicidalIdeationDetected => "suicidal_ideation_detected",
            Self::FrequentSuicidalThoughts => "frequent_suicidal_thoughts",
            Self::SevereDepressionScore => "severe_depression_score",
            Self::ModeratelySevereWithRiskFactors => "moderately_severe_with_risk_factors",
            Self::SevereAnxietyScore => "severe_anxiety_score",
            Self::ModerateAnxietyWithPanicIndicators => "moderate_anxiety_with_panic_indicators",
            Self::SelfHarmItemUnanswered => "self_harm_item_unanswered",
        }
    }
}

impl fmt::Display for CrisisReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum VerdictStatus {
    #[default]
    Complete,
    /// At least one item was unanswered. A negative verdict in this state
    /// is not an all-clear.
    Incomplete,
}

/// Score summary for one instrument within an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstrumentScore {
    pub instrument_id: String,
    /// Sum of answered items. A lower bound when items are missing.
    pub score: u32,
    pub answered: usize,
    pub item_count: usize,
    /// Only present when every item was answered.
    pub band: Option<SeverityBand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CrisisVerdict {
    pub assessment_id: Uuid,
    pub requires_intervention: bool,
    pub severity: Severity,
    pub reasons: BTreeSet<CrisisReason>,
    pub response_time_ms: f64,
    pub intervention_type: InterventionType,
    pub status: VerdictStatus,
    /// Indices into the assessment's answers that were left blank.
    pub unanswered: Vec<usize>,
    pub scores: Vec<InstrumentScore>,
    pub classified_at: jiff::Timestamp,
}

impl CrisisVerdict {
    pub fn has_reason(&self, reason: CrisisReason) -> bool {
        self.reasons.contains(&reason)
    }

    /// True only when every item was answered and nothing calls for
    /// intervention.
    pub fn all_clear(&self) -> bool {
        self.status == VerdictStatus::Complete && !self.requires_intervention
    }

    pub fn reason_tags(&self) -> Vec<&'static str> {
        self.reasons.iter().map(CrisisReason::as_tag).collect()
    }
}
