//! Default budgets and thresholds for the crisis path.

/// Deadline for crisis-tagged actions run under the response monitor.
pub const CRISIS_BUDGET_MS: u64 = 200;

/// Per-device ceiling for crisis alert delivery.
pub const PROPAGATION_BUDGET_MS: u64 = 200;

/// Lowest priority that belongs to the preempt (crisis) tier.
pub const PREEMPT_THRESHOLD: i32 = 10;

/// Fraction of a budget above which a success is reported as near-budget.
pub const NEAR_BUDGET_RATIO: f64 = 0.8;
