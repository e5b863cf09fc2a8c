use thiserror::Error;

use solace_instruments::error::InstrumentError;

/// Classification failures. There is no partial verdict: any error here
/// forces the caller off the happy path instead of reading "no crisis".
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("invalid assessment input: {message}")]
    InvalidAssessmentInput {
        message: String,
        #[source]
        source: Option<InstrumentError>,
    },
}

impl From<InstrumentError> for ClassifyError {
    fn from(e: InstrumentError) -> Self {
        ClassifyError::InvalidAssessmentInput {
            message: e.to_string(),
            source: Some(e),
        }
    }
}
