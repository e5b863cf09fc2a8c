//! solace-engine
//!
//! Wires the crisis path together: classify an assessment, run the
//! intervention trigger under the response monitor, put a crisis broadcast
//! at the front of the sync queue, and drain the queue into the fleet
//! propagator. Also owns configuration loading and tracing setup.

pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

pub use crate::config::EngineConfig;
pub use crate::engine::{
    AssessmentOutcome, Collaborators, CrisisEngine, DispatchOutcome, DispatchRecord, DrainReport,
    InterventionTrigger, OperationHandler,
};
pub use crate::error::{CollaboratorError, ConfigError, EngineError};
