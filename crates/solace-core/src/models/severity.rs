use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Crisis severity. Variants are declared in ascending order so the derived
/// `Ord` is the clinical ordering: `None < Moderate < High < Critical`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    #[default]
    None,
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// Raise to `candidate` if it is more severe. Never lowers.
    pub fn escalate(self, candidate: Severity) -> Severity {
        self.max(candidate)
    }

    pub fn intervention(self) -> InterventionType {
        match self {
            Severity::Critical => InterventionType::Emergency,
            Severity::High => InterventionType::Resources,
            Severity::Moderate => InterventionType::Monitoring,
            Severity::None => InterventionType::None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InterventionType {
    #[default]
    None,
    Monitoring,
    Resources,
    Emergency,
}

/// Questionnaire severity band, a pure function of an instrument's total
/// score. Bands describe symptom load; they do not imply intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityBand {
    Minimal,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
}
