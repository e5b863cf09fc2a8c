use thiserror::Error;

use crate::scoring::ValidationError;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    /// Wrong answer count or out-of-range values. Never coerced.
    #[error("invalid assessment input for {instrument}: {message}")]
    InvalidAssessmentInput {
        instrument: String,
        message: String,
        violations: Vec<ValidationError>,
    },
}

impl InstrumentError {
    pub(crate) fn invalid(instrument: &str, violations: Vec<ValidationError>) -> Self {
        let message = violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Self::InvalidAssessmentInput {
            instrument: instrument.to_string(),
            message,
            violations,
        }
    }
}
