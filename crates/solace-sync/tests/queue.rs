use std::sync::Arc;

use proptest::prelude::*;
use solace_audit::{EngineEvent, RecordingSink};
use solace_core::models::{QueueSnapshot, SyncOperation};
use solace_sync::{QueueError, SharedSyncQueue, SyncQueue};

fn op(id: &str, priority: i32) -> SyncOperation {
    SyncOperation::data(priority, Vec::new()).with_id(id)
}

#[test]
fn crisis_operation_jumps_the_line() {
    let mut queue = SyncQueue::default();
    for (id, priority) in [("p3", 3), ("p2", 2), ("p1", 1), ("p5", 5)] {
        queue.enqueue(op(id, priority)).unwrap();
    }
    queue.enqueue(op("crisis", 10)).unwrap();

    assert_eq!(queue.peek_order(), vec!["crisis", "p5", "p3", "p2", "p1"]);
    let drained: Vec<String> = std::iter::from_fn(|| queue.dequeue())
        .map(|op| op.operation_id)
        .collect();
    assert_eq!(drained, vec!["crisis", "p5", "p3", "p2", "p1"]);
}

#[test]
fn preempt_tier_is_fifo_regardless_of_priority() {
    let mut queue = SyncQueue::new(10);
    queue.enqueue(op("normal", 9)).unwrap();
    queue.enqueue(op("crisis-a", 10)).unwrap();
    queue.enqueue(op("crisis-b", 15)).unwrap();
    queue.enqueue(op("crisis-c", 10)).unwrap();

    assert_eq!(
        queue.peek_order(),
        vec!["crisis-a", "crisis-b", "crisis-c", "normal"]
    );
}

#[test]
fn equal_priorities_keep_enqueue_order() {
    let mut queue = SyncQueue::default();
    queue.enqueue(op("a", 4)).unwrap();
    queue.enqueue(op("b", 4)).unwrap();
    queue.enqueue(op("c", 6)).unwrap();
    queue.enqueue(op("d", 4)).unwrap();
    assert_eq!(queue.peek_order(), vec!["c", "a", "b", "d"]);
}

#[test]
fn empty_queue_dequeues_none() {
    let mut queue = SyncQueue::default();
    assert!(queue.dequeue().is_none());
    assert_eq!(queue.size(), 0);
    assert!(queue.is_empty());
}

#[test]
fn invalid_priority_is_rejected_without_touching_state() {
    let mut queue = SyncQueue::default();
    queue.enqueue(op("keep", 2)).unwrap();

    let err = queue.enqueue(op("bad", -1)).unwrap_err();
    assert_eq!(
        err,
        QueueError::InvalidPriority {
            operation_id: "bad".to_string(),
            priority: -1
        }
    );
    assert_eq!(queue.peek_order(), vec!["keep"]);
}

#[test]
fn duplicate_ids_are_rejected_until_dequeued() {
    let mut queue = SyncQueue::default();
    queue.enqueue(op("same", 1)).unwrap();
    assert_eq!(
        queue.enqueue(op("same", 12)).unwrap_err(),
        QueueError::DuplicateOperation("same".to_string())
    );
    assert_eq!(queue.size(), 1);

    queue.dequeue().unwrap();
    queue.enqueue(op("same", 1)).unwrap();
    assert_eq!(queue.size(), 1);
}

#[test]
fn shared_queue_publishes_snapshots() {
    let sink = Arc::new(RecordingSink::new());
    let queue = SharedSyncQueue::new(SyncQueue::default(), sink.clone());
    let state = queue.subscribe();

    queue.enqueue(op("low", 1)).unwrap();
    queue.enqueue(op("crisis", 10)).unwrap();
    assert_eq!(
        *state.borrow(),
        QueueSnapshot {
            size: 2,
            front: Some("crisis".to_string())
        }
    );

    assert_eq!(queue.dequeue().unwrap().operation_id, "crisis");
    assert_eq!(state.borrow().front.as_deref(), Some("low"));
    assert_eq!(queue.size(), 1);

    assert!(queue.enqueue(op("low", 3)).is_err());
    assert_eq!(sink.kinds().len(), 3);
}

#[tokio::test]
async fn shared_queue_is_usable_across_tasks() {
    let queue = SharedSyncQueue::new(SyncQueue::default(), Arc::new(RecordingSink::new()));
    let mut handles = Vec::new();
    for i in 0..8 {
        let queue = queue.clone();
        handles.push(tokio::spawn(async move {
            queue.enqueue(op(&format!("op-{i}"), i % 3)).unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    queue.enqueue(op("crisis", 11)).unwrap();

    assert_eq!(queue.size(), 9);
    assert_eq!(queue.dequeue().unwrap().operation_id, "crisis");
}

#[test]
fn dequeue_preempt_only_takes_the_crisis_tier() {
    let mut queue = SyncQueue::default();
    queue.enqueue(op("upload", 9)).unwrap();
    assert!(queue.dequeue_preempt().is_none());
    assert_eq!(queue.size(), 1);

    queue.enqueue(op("crisis-a", 12)).unwrap();
    queue.enqueue(op("crisis-b", 10)).unwrap();
    assert_eq!(queue.dequeue_preempt().unwrap().operation_id, "crisis-a");
    assert_eq!(queue.dequeue_preempt().unwrap().operation_id, "crisis-b");
    assert!(queue.dequeue_preempt().is_none());
    assert_eq!(queue.peek_order(), vec!["upload"]);
}

#[test]
fn concurrent_writers_leave_the_latest_snapshot_published() {
    for round in 0..200 {
        let sink = Arc::new(RecordingSink::new());
        let queue = SharedSyncQueue::new(SyncQueue::default(), sink.clone());
        let state = queue.subscribe();

        std::thread::scope(|scope| {
            for writer in 0..4 {
                let queue = queue.clone();
                scope.spawn(move || {
                    for i in 0..20 {
                        queue
                            .enqueue(op(&format!("w{writer}-{i}"), (i % 12) as i32))
                            .unwrap();
                        if i % 3 == 0 {
                            queue.dequeue();
                        }
                    }
                });
            }
        });

        let published = state.borrow().clone();
        assert_eq!(published.size, queue.size(), "round {round}");
        assert_eq!(
            published.front,
            queue.peek_order().first().cloned(),
            "round {round}"
        );
        match sink.events().last() {
            Some(EngineEvent::QueueStateChanged(last)) => assert_eq!(*last, published),
            other => panic!("unexpected last event: {other:?}"),
        }
    }
}

proptest! {
    #[test]
    fn crisis_always_dequeues_next(priorities in proptest::collection::vec(0i32..10, 0..40)) {
        let mut queue = SyncQueue::default();
        for (i, priority) in priorities.iter().enumerate() {
            queue.enqueue(op(&format!("op-{i}"), *priority)).unwrap();
        }
        queue.enqueue(op("crisis", 10)).unwrap();
        prop_assert_eq!(queue.dequeue().unwrap().operation_id, "crisis");
    }

    #[test]
    fn drain_order_is_deterministic_and_priority_sorted(
        priorities in proptest::collection::vec(0i32..14, 0..40),
    ) {
        let build = || {
            let mut queue = SyncQueue::default();
            for (i, priority) in priorities.iter().enumerate() {
                queue.enqueue(op(&format!("op-{i}"), *priority)).unwrap();
            }
            queue
        };
        let first = build().peek_order();
        prop_assert_eq!(&first, &build().peek_order());

        let mut queue = build();
        let drained: Vec<i32> = std::iter::from_fn(|| queue.dequeue())
            .map(|op| op.priority.min(10))
            .collect();
        prop_assert!(drained.windows(2).all(|w| w[0] >= w[1]));
    }
}
