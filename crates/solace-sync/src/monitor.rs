use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use solace_audit::{EngineEvent, EventSink};
use solace_core::defaults::{CRISIS_BUDGET_MS, NEAR_BUDGET_RATIO};
use solace_core::models::MonitorRecord;

use crate::error::MonitorError;

/// Result of one bounded execution.
#[derive(Debug)]
pub struct BoundedOutcome<T> {
    pub action: String,
    pub result: Result<T, MonitorError>,
    pub response_time_ms: f64,
    pub budget_ms: f64,
}

impl<T> BoundedOutcome<T> {
    pub fn success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn reason(&self) -> Option<&'static str> {
        self.result.as_ref().err().map(MonitorError::reason)
    }

    pub fn into_result(self) -> Result<T, MonitorError> {
        self.result
    }
}

/// Races actions against a deadline and reports every outcome.
///
/// The action runs as its own task. When the deadline wins, the task's
/// handle is dropped: the action may still run to completion, but nothing
/// can observe its result. The monitor never retries.
#[derive(Clone)]
pub struct ResponseMonitor {
    sink: Arc<dyn EventSink>,
    crisis_budget: Duration,
    near_budget_ratio: f64,
}

impl ResponseMonitor {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            crisis_budget: Duration::from_millis(CRISIS_BUDGET_MS),
            near_budget_ratio: NEAR_BUDGET_RATIO,
        }
    }

    pub fn with_crisis_budget(mut self, budget: Duration) -> Self {
        self.crisis_budget = budget;
        self
    }

    pub fn with_near_budget_ratio(mut self, ratio: f64) -> Self {
        self.near_budget_ratio = ratio;
        self
    }

    pub fn crisis_budget(&self) -> Duration {
        self.crisis_budget
    }

    /// [`execute_bounded`](Self::execute_bounded) with the crisis budget.
    pub async fn execute_crisis<F, T, E>(&self, action_name: &str, action: F) -> BoundedOutcome<T>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        self.execute_bounded(action_name, action, self.crisis_budget)
            .await
    }

    pub async fn execute_bounded<F, T, E>(
        &self,
        action_name: &str,
        action: F,
        max: Duration,
    ) -> BoundedOutcome<T>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let started = Instant::now();
        let handle = tokio::spawn(action);
        let settled = tokio::time::timeout(max, handle).await;
        let elapsed_ms = millis(started.elapsed());
        let budget_ms = millis(max);

        let result = match settled {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(e))) => Err(MonitorError::ActionFailed {
                action: action_name.to_string(),
                message: e.to_string(),
                elapsed_ms,
            }),
            Ok(Err(join_err)) => Err(MonitorError::ActionFailed {
                action: action_name.to_string(),
                message: format!("task aborted: {join_err}"),
                elapsed_ms,
            }),
            Err(_) => Err(MonitorError::TimeoutExceeded {
                action: action_name.to_string(),
                budget_ms,
                elapsed_ms,
            }),
        };

        let outcome = BoundedOutcome {
            action: action_name.to_string(),
            result,
            response_time_ms: elapsed_ms,
            budget_ms,
        };
        self.report(&outcome);
        outcome
    }

    fn report<T>(&self, outcome: &BoundedOutcome<T>) {
        let success = outcome.success();
        let record = MonitorRecord {
            action: outcome.action.clone(),
            success,
            reason: outcome.reason().map(str::to_string),
            response_time_ms: outcome.response_time_ms,
            budget_ms: outcome.budget_ms,
            near_budget: success
                && outcome.response_time_ms >= outcome.budget_ms * self.near_budget_ratio,
        };
        self.sink.record(&EngineEvent::MonitorOutcome(record));
    }
}

pub(crate) fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
