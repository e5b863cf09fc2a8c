use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use solace_core::defaults::PREEMPT_THRESHOLD;
use solace_core::models::{QueueSnapshot, SyncOperation};

use crate::error::QueueError;

/// Position of an operation in the queue.
///
/// Every preempt-tier priority collapses to the threshold, so crisis
/// operations share one FIFO tier ahead of everything else. Below the
/// threshold, higher priority drains first. `seq` is a monotonic enqueue
/// counter, so ties never depend on wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueKey {
    tier: Reverse<i32>,
    seq: u64,
}

/// Unbounded priority queue of pending sync operations.
///
/// Dequeue order is a deterministic function of the enqueue history.
#[derive(Debug)]
pub struct SyncQueue {
    entries: BTreeMap<QueueKey, SyncOperation>,
    queued_ids: HashSet<String>,
    next_seq: u64,
    preempt_threshold: i32,
}

impl Default for SyncQueue {
    fn default() -> Self {
        Self::new(PREEMPT_THRESHOLD)
    }
}

impl SyncQueue {
    pub fn new(preempt_threshold: i32) -> Self {
        Self {
            entries: BTreeMap::new(),
            queued_ids: HashSet::new(),
            next_seq: 0,
            preempt_threshold,
        }
    }

    pub fn preempt_threshold(&self) -> i32 {
        self.preempt_threshold
    }

    /// Insert an operation. Rejected operations leave the queue untouched.
    pub fn enqueue(&mut self, operation: SyncOperation) -> Result<(), QueueError> {
        if operation.priority < 0 {
            return Err(QueueError::InvalidPriority {
                operation_id: operation.operation_id,
                priority: operation.priority,
            });
        }
        if self.queued_ids.contains(&operation.operation_id) {
            return Err(QueueError::DuplicateOperation(operation.operation_id));
        }

        let preempt = operation.is_preempt(self.preempt_threshold);
        let key = QueueKey {
            tier: Reverse(operation.priority.min(self.preempt_threshold)),
            seq: self.next_seq,
        };
        self.next_seq += 1;

        tracing::debug!(
            operation_id = %operation.operation_id,
            priority = operation.priority,
            preempt,
            queued = self.entries.len() + 1,
            "enqueued sync operation"
        );
        self.queued_ids.insert(operation.operation_id.clone());
        self.entries.insert(key, operation);
        Ok(())
    }

    /// Remove and return the front operation. Never blocks.
    pub fn dequeue(&mut self) -> Option<SyncOperation> {
        let (_, operation) = self.entries.pop_first()?;
        self.queued_ids.remove(&operation.operation_id);
        Some(operation)
    }

    /// Remove and return the front operation only if it is in the preempt
    /// tier.
    pub fn dequeue_preempt(&mut self) -> Option<SyncOperation> {
        let (key, _) = self.entries.first_key_value()?;
        if key.tier.0 < self.preempt_threshold {
            return None;
        }
        self.dequeue()
    }

    pub fn front(&self) -> Option<&SyncOperation> {
        self.entries.values().next()
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Operation IDs in dequeue order.
    pub fn peek_order(&self) -> Vec<String> {
        self.entries
            .values()
            .map(|op| op.operation_id.clone())
            .collect()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            size: self.size(),
            front: self.front().map(|op| op.operation_id.clone()),
        }
    }
}
