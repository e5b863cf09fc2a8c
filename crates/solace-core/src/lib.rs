//! solace-core
//!
//! Pure domain types shared by the crisis engine: severities, verdicts,
//! sync operations, device records and propagation results.
//! No async runtime dependency. This is the shared vocabulary of Solace.

pub mod defaults;
pub mod error;
pub mod models;

pub use crate::error::CoreError;
