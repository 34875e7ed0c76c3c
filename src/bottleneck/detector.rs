// Regression threshold checks, KPI categorization and bottleneck detection

use crate::bottleneck::scoring::{calculate_impact_score, classify_severity};
use crate::config::{AnalysisConfig, Severity};
use crate::delta::{DeltaResult, Direction, MetricDeltas, ModelDeltas};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Changes smaller than this (in percent) are treated as noise
pub const NOISE_FLOOR_PERCENT: f64 = 0.5;

/// Categorization of one KPI's change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiCategory {
    Improved,
    Regressed,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiCategorization {
    pub category: KpiCategory,
    pub delta: Option<f64>,
}

/// Kind of regression flagged on a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegressionFlag {
    ExecutionTimeRegression,
    CostRegression,
    DataDrift,
}

impl RegressionFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegressionFlag::ExecutionTimeRegression => "EXECUTION_TIME_REGRESSION",
            RegressionFlag::CostRegression => "COST_REGRESSION",
            RegressionFlag::DataDrift => "DATA_DRIFT",
        }
    }
}

/// Bottleneck analysis for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckResult {
    pub model_name: String,

    /// Weighted regression impact, 0-100
    pub impact_score: f64,

    pub severity: Severity,

    pub regression_flags: BTreeSet<RegressionFlag>,

    /// Absolute delta per flagged metric ("execution_time", "cost")
    pub regression_amounts: BTreeMap<String, f64>,

    pub data_drift_detected: bool,

    pub kpi_categorizations: BTreeMap<String, KpiCategorization>,
}

impl BottleneckResult {
    pub fn is_bottleneck(&self) -> bool {
        !self.regression_flags.is_empty()
    }

    /// Cost regression amount, if cost was flagged
    pub fn cost_regression(&self) -> Option<f64> {
        self.regression_amounts.get("cost").copied()
    }
}

/// Model name → bottleneck result
pub type Bottlenecks = BTreeMap<String, BottleneckResult>;

/// Whether an execution-time delta strictly exceeds `threshold_percent`
pub fn check_execution_time_regression(delta: Option<f64>, threshold_percent: f64) -> bool {
    let is_regression = delta.is_some_and(|d| d > threshold_percent);
    if let (true, Some(d)) = (is_regression, delta) {
        tracing::warn!(
            "Execution time regression detected: {:.2}% > {}% threshold",
            d,
            threshold_percent
        );
    }
    is_regression
}

/// Whether a cost delta strictly exceeds `threshold_percent`
pub fn check_cost_regression(delta: Option<f64>, threshold_percent: f64) -> bool {
    let is_regression = delta.is_some_and(|d| d > threshold_percent);
    if let (true, Some(d)) = (is_regression, delta) {
        tracing::warn!(
            "Cost regression detected: {:.2}% > {}% threshold",
            d,
            threshold_percent
        );
    }
    is_regression
}

/// Whether a delta result carries the data drift annotation
pub fn check_data_drift(delta_result: Option<&DeltaResult>) -> bool {
    delta_result.is_some_and(DeltaResult::has_drift)
}

/// Categorize one KPI as improved, regressed or neutral
pub fn categorize_kpi(metric_name: &str, delta_result: Option<&DeltaResult>) -> KpiCategorization {
    let Some(result) = delta_result else {
        return KpiCategorization {
            category: KpiCategory::Neutral,
            delta: None,
        };
    };
    let Some(delta) = result.delta() else {
        return KpiCategorization {
            category: KpiCategory::Neutral,
            delta: None,
        };
    };

    let category = if delta.abs() < NOISE_FLOOR_PERCENT {
        KpiCategory::Neutral
    } else {
        match result.direction() {
            Some(Direction::Improvement) => KpiCategory::Improved,
            Some(Direction::Regression) => KpiCategory::Regressed,
            None => KpiCategory::Neutral,
        }
    };

    tracing::debug!(
        "KPI {}: {:?} (delta={:.2}%, direction={})",
        metric_name,
        category,
        delta,
        result.direction_symbol()
    );

    KpiCategorization {
        category,
        delta: Some(delta),
    }
}

/// Categorize every KPI of a model, skipping `_`-prefixed keys
pub fn categorize_model_kpis(
    model_name: &str,
    model_deltas: &MetricDeltas,
) -> BTreeMap<String, KpiCategorization> {
    tracing::debug!(
        "Categorizing {} KPIs for model: {}",
        model_deltas.len(),
        model_name
    );

    model_deltas
        .iter()
        .filter(|(metric, _)| !metric.starts_with('_'))
        .map(|(metric, result)| (metric.clone(), categorize_kpi(metric, Some(result))))
        .collect()
}

/// Detect bottlenecks across all models present in both snapshots
///
/// New and removed models are never bottlenecks and are left out of the
/// result. Every other model gets a result, including models with no
/// regressions (severity LOW).
pub fn detect_bottlenecks(model_deltas: &ModelDeltas, config: &AnalysisConfig) -> Bottlenecks {
    let exec_threshold = config.execution_time_threshold();
    let cost_threshold = config.cost_threshold();

    tracing::info!(
        "Detecting bottlenecks across {} models (execution_time_threshold={}%, cost_threshold={}%)",
        model_deltas.len(),
        exec_threshold,
        cost_threshold
    );

    let mut bottlenecks = Bottlenecks::new();

    for (model_name, set) in model_deltas {
        let Some(metrics) = set.metrics() else {
            tracing::debug!(
                "Skipping {}: {}",
                model_name,
                set.lifecycle_status().unwrap_or_default()
            );
            continue;
        };

        let result = analyze_model(model_name, metrics, config, exec_threshold, cost_threshold);

        if result.is_bottleneck() {
            let flags: Vec<&str> = result.regression_flags.iter().map(|f| f.as_str()).collect();
            tracing::warn!(
                "Model {} bottleneck detected: score={:.2}, severity={}, flags=[{}]",
                model_name,
                result.impact_score,
                result.severity,
                flags.join(", ")
            );
        }

        bottlenecks.insert(model_name.clone(), result);
    }

    bottlenecks
}

fn analyze_model(
    model_name: &str,
    metrics: &MetricDeltas,
    config: &AnalysisConfig,
    exec_threshold: f64,
    cost_threshold: f64,
) -> BottleneckResult {
    let kpi_categorizations = categorize_model_kpis(model_name, metrics);

    let exec_delta = metrics.get("execution_time").and_then(DeltaResult::delta);
    let cost_delta = metrics
        .get("cost")
        .or_else(|| metrics.get("estimated_cost_usd"))
        .and_then(DeltaResult::delta);

    let exec_regression = check_execution_time_regression(exec_delta, exec_threshold);
    let cost_regression = check_cost_regression(cost_delta, cost_threshold);
    let data_drift = metrics.values().any(|r| check_data_drift(Some(r)));
    if data_drift {
        tracing::warn!("Data drift detected for model {}", model_name);
    }

    let impact_score =
        calculate_impact_score(exec_delta, cost_delta, data_drift, &config.impact_weights);

    let mut regression_flags = BTreeSet::new();
    let mut regression_amounts = BTreeMap::new();
    if exec_regression {
        regression_flags.insert(RegressionFlag::ExecutionTimeRegression);
        regression_amounts.insert(
            "execution_time".to_string(),
            exec_delta.map_or(0.0, f64::abs),
        );
    }
    if cost_regression {
        regression_flags.insert(RegressionFlag::CostRegression);
        regression_amounts.insert("cost".to_string(), cost_delta.map_or(0.0, f64::abs));
    }
    if data_drift {
        regression_flags.insert(RegressionFlag::DataDrift);
    }

    BottleneckResult {
        model_name: model_name.to_string(),
        impact_score,
        severity: classify_severity(exec_regression, cost_regression, data_drift),
        regression_flags,
        regression_amounts,
        data_drift_detected: data_drift,
        kpi_categorizations,
    }
}
