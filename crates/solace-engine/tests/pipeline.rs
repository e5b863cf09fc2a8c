use std::sync::{Arc, Mutex};
use std::time::Duration;

use solace_audit::RecordingSink;
use solace_core::models::{DeviceRecord, OperationKind, Severity, SyncOperation};
use solace_crisis::{Assessment, AssessmentKind};
use solace_engine::{
    CollaboratorError, Collaborators, CrisisEngine, DispatchOutcome, EngineConfig,
    InterventionTrigger, OperationHandler,
};
use solace_sync::{BoxFuture, SimulatedTransport};

struct DelayedTrigger(Duration);

impl InterventionTrigger for DelayedTrigger {
    fn trigger(
        &self,
        _verdict: solace_core::models::CrisisVerdict,
    ) -> BoxFuture<'static, Result<(), CollaboratorError>> {
        let delay = self.0;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(())
        })
    }
}

#[derive(Default)]
struct LoggingHandler {
    handled: Mutex<Vec<String>>,
    failing: Vec<String>,
    delay: Duration,
}

impl OperationHandler for LoggingHandler {
    fn handle<'a>(
        &'a self,
        operation: &'a SyncOperation,
    ) -> BoxFuture<'a, Result<(), CollaboratorError>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            if self.failing.contains(&operation.operation_id) {
                return Err(CollaboratorError::new("server rejected upload"));
            }
            self.handled
                .lock()
                .unwrap()
                .push(operation.operation_id.clone());
            Ok(())
        })
    }
}

struct Harness {
    engine: CrisisEngine,
    sink: Arc<RecordingSink>,
    handler: Arc<LoggingHandler>,
}

fn harness(trigger_delay: Duration, handler: LoggingHandler) -> Harness {
    let sink = Arc::new(RecordingSink::new());
    let handler = Arc::new(handler);
    let engine = CrisisEngine::new(
        EngineConfig::default(),
        Collaborators {
            sink: sink.clone(),
            transport: Arc::new(SimulatedTransport::new(Duration::from_millis(30))),
            trigger: Arc::new(DelayedTrigger(trigger_delay)),
            handler: handler.clone(),
        },
    )
    .unwrap();
    Harness {
        engine,
        sink,
        handler,
    }
}

fn fleet() -> Vec<DeviceRecord> {
    vec![
        DeviceRecord::new("phone", true, true),
        DeviceRecord::new("tablet", true, true),
        DeviceRecord::new("laptop", false, true),
    ]
}

fn data(id: &str, priority: i32) -> SyncOperation {
    SyncOperation::data(priority, b"mood-log".to_vec()).with_id(id)
}

fn self_harm_flagged() -> Assessment {
    Assessment::complete(AssessmentKind::Depression, &[0, 0, 0, 0, 0, 0, 0, 0, 1])
}

fn slow_uploads(delay: Duration) -> LoggingHandler {
    LoggingHandler {
        delay,
        ..LoggingHandler::default()
    }
}

#[tokio::test(start_paused = true)]
async fn crisis_assessment_preempts_background_sync() {
    let h = harness(Duration::from_millis(20), LoggingHandler::default());
    for (id, priority) in [("p3", 3), ("p2", 2), ("p1", 1), ("p5", 5)] {
        h.engine.enqueue(data(id, priority)).unwrap();
    }

    let outcome = h.engine.assess(&self_harm_flagged()).await.unwrap();

    assert_eq!(outcome.verdict.severity, Severity::Critical);
    assert!(matches!(outcome.intervention, Some(Ok(()))));
    let broadcast_id = outcome.broadcast_id.unwrap();
    assert_eq!(h.engine.queue().peek_order()[0], broadcast_id);

    let report = h.engine.drain("phone", &fleet()).await;
    assert_eq!(
        report.operation_ids(),
        vec![broadcast_id.as_str(), "p5", "p3", "p2", "p1"]
    );
    assert_eq!(report.dispatched[0].kind, OperationKind::CrisisBroadcast);

    let propagation = report.propagations().next().unwrap();
    assert!(propagation.coordination_success);
    assert_eq!(propagation.results.len(), 3);
    assert_eq!(
        *h.handler.handled.lock().unwrap(),
        vec!["p5", "p3", "p2", "p1"]
    );

    let kinds = h.sink.kinds();
    assert!(kinds.contains(&"classification_completed"));
    assert!(kinds.contains(&"monitor_outcome"));
    assert!(kinds.contains(&"propagation_completed"));
    assert!(kinds.contains(&"queue_state_changed"));
}

#[tokio::test(start_paused = true)]
async fn non_crisis_assessment_queues_nothing() {
    let h = harness(Duration::from_millis(20), LoggingHandler::default());
    let assessment = Assessment::complete(AssessmentKind::Anxiety, &[2, 2, 2, 2, 2, 2, 2]);
    let outcome = h.engine.assess(&assessment).await.unwrap();

    assert!(!outcome.verdict.requires_intervention);
    assert!(outcome.broadcast_id.is_none());
    assert!(outcome.intervention.is_none());
    assert_eq!(h.engine.queue().size(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_trigger_times_out_but_keeps_the_verdict_and_broadcast() {
    let h = harness(Duration::from_millis(500), LoggingHandler::default());
    let assessment = Assessment::complete(AssessmentKind::Depression, &[3, 3, 3, 3, 2, 2, 2, 2, 0]);
    let outcome = h.engine.assess(&assessment).await.unwrap();

    assert_eq!(outcome.verdict.severity, Severity::High);
    let err = outcome.intervention.unwrap().unwrap_err();
    assert!(err.is_timeout());
    assert!(solace_engine::EngineError::from(err).is_retryable());
    assert_eq!(h.engine.queue().size(), 1);
}

#[tokio::test(start_paused = true)]
async fn invalid_assessment_is_an_explicit_error() {
    let h = harness(Duration::from_millis(20), LoggingHandler::default());
    let assessment = Assessment::complete(AssessmentKind::Depression, &[0, 0, 5, 0, 0, 0, 0, 0, 0]);
    let err = h.engine.assess(&assessment).await.unwrap_err();

    assert!(err.needs_support());
    assert!(!err.is_retryable());
    assert_eq!(h.engine.queue().size(), 0);
    assert!(h.sink.kinds().is_empty());
}

#[tokio::test(start_paused = true)]
async fn handler_failures_do_not_stop_the_drain() {
    let handler = LoggingHandler {
        failing: vec!["bad".to_string()],
        ..LoggingHandler::default()
    };
    let h = harness(Duration::from_millis(20), handler);
    h.engine.enqueue(data("bad", 5)).unwrap();
    h.engine.enqueue(data("good", 1)).unwrap();

    let report = h.engine.drain("phone", &fleet()).await;
    assert!(matches!(
        report.dispatched[0].outcome,
        DispatchOutcome::HandlerFailed(_)
    ));
    assert!(matches!(report.dispatched[1].outcome, DispatchOutcome::Handled));
    assert_eq!(h.engine.queue().size(), 0);
}

#[tokio::test(start_paused = true)]
async fn drain_loop_picks_up_new_work_until_shutdown() {
    let h = Arc::new(harness(Duration::from_millis(20), LoggingHandler::default()));
    let (_devices_tx, devices) = tokio::sync::watch::channel(fleet());
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let runner = {
        let h = h.clone();
        tokio::spawn(async move {
            h.engine
                .run_until("phone", devices, async {
                    let _ = stop_rx.await;
                })
                .await;
        })
    };

    h.engine.enqueue(data("later", 2)).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(h.engine.queue().size(), 0);
    assert_eq!(*h.handler.handled.lock().unwrap(), vec!["later"]);

    stop_tx.send(()).unwrap();
    runner.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn crisis_broadcast_preempts_an_in_flight_upload() {
    let h = Arc::new(harness(Duration::from_millis(20), slow_uploads(Duration::from_secs(1))));
    h.engine.enqueue(data("upload", 2)).unwrap();

    let assessor = {
        let h = h.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let outcome = h.engine.assess(&self_harm_flagged()).await.unwrap();
            outcome.broadcast_id.unwrap()
        })
    };

    let report = h.engine.drain("phone", &fleet()).await;
    let broadcast_id = assessor.await.unwrap();

    assert_eq!(report.operation_ids(), vec![broadcast_id.as_str(), "upload"]);
    assert_eq!(report.dispatched[0].kind, OperationKind::CrisisBroadcast);
    assert!(matches!(report.dispatched[1].outcome, DispatchOutcome::Handled));
    let propagation = report.propagations().next().unwrap();
    assert!(propagation.coordination_success);
    assert_eq!(*h.handler.handled.lock().unwrap(), vec!["upload"]);
}

#[tokio::test(start_paused = true)]
async fn hung_upload_does_not_hold_back_the_crisis_alert() {
    let h = Arc::new(harness(Duration::from_millis(20), slow_uploads(Duration::from_secs(30))));
    let (_devices_tx, devices) = tokio::sync::watch::channel(fleet());
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let runner = {
        let h = h.clone();
        tokio::spawn(async move {
            h.engine
                .run_until("phone", devices, async {
                    let _ = stop_rx.await;
                })
                .await;
        })
    };

    h.engine.enqueue(data("upload", 2)).unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    h.engine.assess(&self_harm_flagged()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(h.engine.queue().size(), 0);
    assert!(h.sink.kinds().contains(&"propagation_completed"));
    assert!(h.handler.handled.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(*h.handler.handled.lock().unwrap(), vec!["upload"]);

    stop_tx.send(()).unwrap();
    runner.await.unwrap();
}

#[test]
fn engine_rejects_invalid_config() {
    let config = EngineConfig {
        crisis_budget_ms: 0,
        ..EngineConfig::default()
    };
    let result = CrisisEngine::new(
        config,
        Collaborators {
            sink: Arc::new(RecordingSink::new()),
            transport: Arc::new(SimulatedTransport::default()),
            trigger: Arc::new(DelayedTrigger(Duration::ZERO)),
            handler: Arc::new(LoggingHandler::default()),
        },
    );
    assert!(result.is_err());
}
