//! solace-audit
//!
//! Outbound engine events and the sinks that receive them. UI and telemetry
//! collaborators implement [`EventSink`]; the default [`TracingSink`] logs
//! every event as a structured `tracing` record.

pub mod error;
pub mod events;
pub mod sink;

pub use crate::events::EngineEvent;
pub use crate::sink::{EventSink, JsonLinesSink, RecordingSink, TracingSink};
