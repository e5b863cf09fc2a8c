//! solace-crisis
//!
//! Turns a completed (or partially completed) screening assessment into a
//! [`CrisisVerdict`]. Pure and synchronous: classification sits on the
//! crisis-latency path and must never suspend.
//!
//! A positive answer on any self-harm indicator item forces
//! `Severity::Critical`, whatever the rest of the assessment says.

pub mod assessment;
pub mod classify;
pub mod error;

pub use crate::assessment::{Assessment, AssessmentKind, RiskSignals};
pub use crate::classify::classify;
pub use crate::error::ClassifyError;

pub use solace_core::models::CrisisVerdict;
