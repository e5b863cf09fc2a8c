use thiserror::Error;

use solace_core::CoreError;
use solace_crisis::ClassifyError;
use solace_sync::{MonitorError, QueueError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory found")]
    NoConfigDir,

    #[error("failed to read config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not a JSON object")]
    NotAnObject,

    #[error(
        "config_version {found} is newer than this build supports ({supported}). Please update Solace."
    )]
    UnsupportedVersion { found: u64, supported: u32 },

    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: String, value: String },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by an external collaborator (intervention trigger,
/// operation handler).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EngineError {
    /// The caller may retry, possibly through a fallback path.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Monitor(e) if e.is_timeout())
    }

    /// Bad input that retrying will not fix.
    pub fn needs_support(&self) -> bool {
        matches!(self, Self::Classify(ClassifyError::InvalidAssessmentInput { .. }))
    }
}
