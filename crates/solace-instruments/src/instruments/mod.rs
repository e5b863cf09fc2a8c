pub mod gad7;
pub mod phq9;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Instrument;
use crate::scoring::{AnswerRange, Item};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InstrumentKind {
    Phq9,
    Gad7,
}

impl InstrumentKind {
    pub fn instrument(self) -> &'static dyn Instrument {
        match self {
            InstrumentKind::Phq9 => &phq9::Phq9,
            InstrumentKind::Gad7 => &gad7::Gad7,
        }
    }
}

fn frequency_items(items: &[(&str, &str)]) -> Vec<Item> {
    items
        .iter()
        .map(|(id, prompt)| Item {
            id: id.to_string(),
            prompt: prompt.to_string(),
            range: AnswerRange::FREQUENCY,
        })
        .collect()
}
