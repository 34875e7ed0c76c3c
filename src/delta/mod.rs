// Baseline vs candidate delta calculation
//
// Percentage change per KPI, an improvement/regression direction that depends
// on whether the metric is "lower is better", and per-model aggregation that
// tags models present in only one snapshot.

mod aggregator;
mod calculator;
mod summary;

pub use aggregator::{
    calculate_all_deltas, calculate_model_deltas, MetricDeltas, ModelDeltaSet, ModelDeltas,
};
pub use calculator::{
    calculate_delta, determine_direction, DeltaIssue, DeltaOutcome, DeltaResult, Direction,
    DRIFT_ANNOTATION, DRIFT_MARKER,
};
pub use summary::{format_delta_output, summarize_deltas, DeltaSummary};
