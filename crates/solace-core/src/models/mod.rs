pub mod device;
pub mod event;
pub mod monitor;
pub mod report;
pub mod severity;
pub mod sync_operation;
pub mod verdict;

pub use device::{DeviceRecord, PropagationResult, PropagationStatus};
pub use event::CrisisEvent;
pub use monitor::MonitorRecord;
pub use report::{PropagationReport, QueueSnapshot};
pub use severity::{InterventionType, Severity, SeverityBand};
pub use sync_operation::{OperationKind, SyncOperation};
pub use verdict::{CrisisReason, CrisisVerdict, InstrumentScore, VerdictStatus};
