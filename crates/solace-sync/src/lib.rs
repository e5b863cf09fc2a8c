//! solace-sync
//!
//! Runtime side of the crisis engine:
//! - `monitor`: run an async action under a hard deadline
//! - `queue`: priority sync queue with a preempt (crisis) tier
//! - `shared`: mutex-guarded, observable queue handle
//! - `propagate`: fan a crisis event out to the user's devices
//! - `transport`: delivery seam used by the propagator

pub mod error;
pub mod monitor;
pub mod propagate;
pub mod queue;
pub mod shared;
pub mod transport;

pub use crate::error::{DeliveryError, MonitorError, QueueError};
pub use crate::monitor::{BoundedOutcome, ResponseMonitor};
pub use crate::propagate::FleetPropagator;
pub use crate::queue::SyncQueue;
pub use crate::shared::SharedSyncQueue;
pub use crate::transport::{BoxFuture, DeviceTransport, SimulatedTransport};
