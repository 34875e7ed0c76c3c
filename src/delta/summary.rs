// Cross-model delta statistics and JSON formatting

use crate::delta::aggregator::ModelDeltas;
use crate::delta::calculator::Direction;
use crate::pricing::round_to;
use serde::{Deserialize, Serialize};

/// Improvement/regression counts across every metric of every common model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaSummary {
    pub total_models: usize,
    pub improvements: usize,
    pub regressions: usize,
    pub errors: usize,
    pub total_metrics_processed: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement_avg_delta: Option<f64>,
    /// Smallest (most negative) delta among improvements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement_best: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression_avg_delta: Option<f64>,
    /// Largest delta among regressions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression_worst: Option<f64>,
}

/// Summarize deltas across all models
pub fn summarize_deltas(model_deltas: &ModelDeltas) -> DeltaSummary {
    let mut improvements = Vec::new();
    let mut regressions = Vec::new();
    let mut errors = 0usize;

    for metrics in model_deltas.values().filter_map(|set| set.metrics()) {
        for result in metrics.values() {
            match (result.delta(), result.direction()) {
                (Some(delta), Some(Direction::Improvement)) => improvements.push(delta),
                (Some(delta), Some(Direction::Regression)) => regressions.push(delta),
                _ => errors += 1,
            }
        }
    }

    let summary = DeltaSummary {
        total_models: model_deltas.len(),
        improvements: improvements.len(),
        regressions: regressions.len(),
        errors,
        total_metrics_processed: improvements.len() + regressions.len() + errors,
        improvement_avg_delta: mean(&improvements),
        improvement_best: improvements.iter().copied().reduce(f64::min),
        regression_avg_delta: mean(&regressions),
        regression_worst: regressions.iter().copied().reduce(f64::max),
    };

    tracing::info!(
        "Delta Summary: {} improvements, {} regressions, {} errors",
        summary.improvements,
        summary.regressions,
        summary.errors
    );

    summary
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(round_to(values.iter().sum::<f64>() / values.len() as f64, 2))
}

/// Render model deltas as a JSON value for report output
pub fn format_delta_output(model_deltas: &ModelDeltas) -> serde_json::Value {
    serde_json::to_value(model_deltas).unwrap_or(serde_json::Value::Null)
}
