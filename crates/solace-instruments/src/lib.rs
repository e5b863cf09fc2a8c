//! solace-instruments
//!
//! Screening questionnaire definitions and scoring. Pure data and pure
//! functions with no runtime dependency. Each instrument knows its items, its
//! answer range, its self-harm indicator item (if any) and its severity
//! bands.

pub mod error;
pub mod instruments;
pub mod scoring;

use solace_core::models::SeverityBand;

use crate::error::InstrumentError;
use crate::scoring::{Item, PartialScore, ValidationError};

pub use crate::instruments::InstrumentKind;

/// Trait implemented by each screening instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier for this instrument (e.g., "phq9", "gad7").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "PHQ-9").
    fn name(&self) -> &str;

    /// Items in administration order.
    fn items(&self) -> &[Item];

    /// Severity band for a total score.
    fn band(&self, score: u32) -> SeverityBand;

    /// Index of the item whose positive answer alone signals self-harm risk.
    fn self_harm_index(&self) -> Option<usize> {
        None
    }

    fn item_count(&self) -> usize {
        self.items().len()
    }

    fn max_score(&self) -> u32 {
        self.items().iter().map(|i| u32::from(i.range.max)).sum()
    }

    /// Check answer count and every present value. Returns all violations.
    fn validate_answers(&self, answers: &[Option<u8>]) -> Vec<ValidationError> {
        let items = self.items();
        if answers.len() != items.len() {
            return vec![ValidationError {
                index: None,
                value: None,
                message: format!(
                    "{}: expected {} answers, got {}",
                    self.name(),
                    items.len(),
                    answers.len()
                ),
            }];
        }

        let mut errors = Vec::new();
        for (index, (item, answer)) in items.iter().zip(answers).enumerate() {
            if let Some(value) = *answer
                && !item.range.contains(value)
            {
                errors.push(ValidationError {
                    index: Some(index),
                    value: Some(value),
                    message: format!(
                        "{}: item {} ({}) answer {} is outside range [{}, {}]",
                        self.name(),
                        index + 1,
                        item.id,
                        value,
                        item.range.min,
                        item.range.max,
                    ),
                });
            }
        }
        errors
    }

    /// Sum the answered items, tolerating blanks but never bad values.
    fn score_partial(&self, answers: &[Option<u8>]) -> Result<PartialScore, InstrumentError> {
        let errors = self.validate_answers(answers);
        if !errors.is_empty() {
            return Err(InstrumentError::invalid(self.id(), errors));
        }

        let mut score = 0u32;
        let mut missing = Vec::new();
        for (index, answer) in answers.iter().enumerate() {
            match answer {
                Some(value) => score += u32::from(*value),
                None => missing.push(index),
            }
        }
        Ok(PartialScore {
            score,
            answered: answers.len() - missing.len(),
            missing,
        })
    }

    /// Exact total of a complete response set.
    fn score(&self, answers: &[u8]) -> Result<u32, InstrumentError> {
        let answers: Vec<Option<u8>> = answers.iter().copied().map(Some).collect();
        Ok(self.score_partial(&answers)?.score)
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::phq9::Phq9),
        Box::new(instruments::gad7::Gad7),
    ]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}

/// Like [`get_instrument`], but an unknown ID is an error.
pub fn require_instrument(id: &str) -> Result<Box<dyn Instrument>, InstrumentError> {
    get_instrument(id).ok_or_else(|| InstrumentError::UnknownInstrument(id.to_string()))
}
