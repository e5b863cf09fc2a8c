use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Valid answer range for a questionnaire item (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerRange {
    pub min: u8,
    pub max: u8,
}

impl AnswerRange {
    /// The 0–3 frequency scale shared by PHQ-9 and GAD-7
    /// ("not at all" … "nearly every day").
    pub const FREQUENCY: AnswerRange = AnswerRange { min: 0, max: 3 };

    pub fn contains(&self, value: u8) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One questionnaire item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    pub id: String,
    pub prompt: String,
    pub range: AnswerRange,
}

/// Sum of the answered items of a possibly incomplete response set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PartialScore {
    pub score: u32,
    pub answered: usize,
    /// Indices of unanswered items, ascending.
    pub missing: Vec<usize>,
}

impl PartialScore {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    /// `None` for whole-response problems such as a wrong answer count.
    pub index: Option<usize>,
    pub value: Option<u8>,
    pub message: String,
}
