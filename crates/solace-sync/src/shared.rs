use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use solace_audit::{EngineEvent, EventSink};
use solace_core::models::{QueueSnapshot, SyncOperation};

use crate::error::QueueError;
use crate::queue::SyncQueue;

/// Cloneable handle to a [`SyncQueue`] shared between tasks.
///
/// Every call is serialized behind one mutex and the lock is never held
/// across an await. After each mutation, and before the lock is released,
/// the new [`QueueSnapshot`] is published on a watch channel and reported
/// to the event sink.
#[derive(Clone)]
pub struct SharedSyncQueue {
    queue: Arc<Mutex<SyncQueue>>,
    state: Arc<watch::Sender<QueueSnapshot>>,
    sink: Arc<dyn EventSink>,
}

impl SharedSyncQueue {
    pub fn new(queue: SyncQueue, sink: Arc<dyn EventSink>) -> Self {
        let (state, _) = watch::channel(queue.snapshot());
        Self {
            queue: Arc::new(Mutex::new(queue)),
            state: Arc::new(state),
            sink,
        }
    }

    pub fn enqueue(&self, operation: SyncOperation) -> Result<(), QueueError> {
        let mut queue = self.lock();
        queue.enqueue(operation)?;
        self.publish(&queue);
        Ok(())
    }

    pub fn dequeue(&self) -> Option<SyncOperation> {
        let mut queue = self.lock();
        let operation = queue.dequeue()?;
        self.publish(&queue);
        Some(operation)
    }

    /// Like [`dequeue`](Self::dequeue), but only takes a preempt-tier
    /// operation from the front.
    pub fn dequeue_preempt(&self) -> Option<SyncOperation> {
        let mut queue = self.lock();
        let operation = queue.dequeue_preempt()?;
        self.publish(&queue);
        Some(operation)
    }

    pub fn size(&self) -> usize {
        self.lock().size()
    }

    pub fn peek_order(&self) -> Vec<String> {
        self.lock().peek_order()
    }

    pub fn preempt_threshold(&self) -> i32 {
        self.lock().preempt_threshold()
    }

    /// Watch queue size and front-of-line changes.
    pub fn subscribe(&self) -> watch::Receiver<QueueSnapshot> {
        self.state.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, SyncQueue> {
        match self.queue.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Called with the queue lock held so snapshots publish in mutation order.
    fn publish(&self, queue: &SyncQueue) {
        let snapshot = queue.snapshot();
        self.state.send_replace(snapshot.clone());
        self.sink.record(&EngineEvent::QueueStateChanged(snapshot));
    }
}
