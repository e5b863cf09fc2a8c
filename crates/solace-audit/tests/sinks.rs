use solace_audit::{EngineEvent, EventSink, JsonLinesSink, RecordingSink, TracingSink};
use solace_core::models::{MonitorRecord, QueueSnapshot};

fn timeout_record() -> MonitorRecord {
    MonitorRecord {
        action: "trigger_intervention".to_string(),
        success: false,
        reason: Some("timeout_exceeded".to_string()),
        response_time_ms: 200.0,
        budget_ms: 200.0,
        near_budget: false,
    }
}

#[test]
fn recording_sink_keeps_arrival_order() {
    let sink = RecordingSink::new();
    sink.record(&EngineEvent::QueueStateChanged(QueueSnapshot {
        size: 1,
        front: Some("op-1".to_string()),
    }));
    sink.record(&EngineEvent::MonitorOutcome(timeout_record()));

    assert_eq!(sink.kinds(), vec!["queue_state_changed", "monitor_outcome"]);
}

#[test]
fn json_lines_sink_writes_tagged_objects() {
    let sink = JsonLinesSink::new(Vec::new());
    sink.record(&EngineEvent::MonitorOutcome(timeout_record()));
    sink.record(&EngineEvent::QueueStateChanged(QueueSnapshot::default()));

    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "monitor_outcome");
    assert_eq!(lines[0]["data"]["reason"], "timeout_exceeded");
    assert_eq!(lines[1]["event"], "queue_state_changed");
    assert_eq!(lines[1]["data"]["size"], 0);
}

#[test]
fn tracing_sink_accepts_every_event_kind() {
    let sink = TracingSink;
    sink.record(&EngineEvent::MonitorOutcome(timeout_record()));
    sink.record(&EngineEvent::QueueStateChanged(QueueSnapshot::default()));
}
