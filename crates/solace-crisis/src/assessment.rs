use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use solace_instruments::{Instrument, InstrumentKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AssessmentKind {
    /// PHQ-9 only.
    Depression,
    /// GAD-7 only.
    Anxiety,
    /// PHQ-9 items followed by GAD-7 items.
    Combined,
}

impl AssessmentKind {
    pub fn sections(self) -> &'static [InstrumentKind] {
        match self {
            AssessmentKind::Depression => &[InstrumentKind::Phq9],
            AssessmentKind::Anxiety => &[InstrumentKind::Gad7],
            AssessmentKind::Combined => &[InstrumentKind::Phq9, InstrumentKind::Gad7],
        }
    }

    pub fn expected_len(self) -> usize {
        self.sections()
            .iter()
            .map(|k| k.instrument().item_count())
            .sum()
    }
}

impl fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssessmentKind::Depression => "depression",
            AssessmentKind::Anxiety => "anxiety",
            AssessmentKind::Combined => "combined",
        };
        f.write_str(name)
    }
}

/// Risk signals supplied by collaborators (e.g. a longitudinal trend
/// analyzer). Opaque here; the classifier only reads the flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskSignals {
    /// Auxiliary risk symptoms alongside a moderately severe PHQ-9.
    pub auxiliary_risk: bool,
    /// Panic indicators alongside a moderate GAD-7.
    pub panic_indicators: bool,
}

/// A submitted questionnaire. `None` marks an item the user never answered
/// (e.g. the app was backgrounded mid-entry); it is absent data, not zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assessment {
    pub id: Uuid,
    pub kind: AssessmentKind,
    pub answers: Vec<Option<u8>>,
    #[serde(default)]
    pub signals: RiskSignals,
    pub submitted_at: jiff::Timestamp,
}

impl Assessment {
    pub fn new(kind: AssessmentKind, answers: Vec<Option<u8>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            answers,
            signals: RiskSignals::default(),
            submitted_at: jiff::Timestamp::now(),
        }
    }

    /// An assessment with every item answered.
    pub fn complete(kind: AssessmentKind, answers: &[u8]) -> Self {
        Self::new(kind, answers.iter().copied().map(Some).collect())
    }

    pub fn with_signals(mut self, signals: RiskSignals) -> Self {
        self.signals = signals;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(Option::is_some)
    }
}
