use serde::{Deserialize, Serialize};

/// Metrics where a reduction counts as an improvement
pub const DEFAULT_LOWER_IS_BETTER: &[&str] = &[
    "execution_time",
    "cost",
    "bytes_scanned",
    "credits_consumed",
    "estimated_cost_usd",
    "join_count",
    "cte_count",
    "window_function_count",
];

/// A single regression threshold, expressed in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionThreshold {
    /// Delta (in percent) that must be strictly exceeded to flag a regression
    pub regression_threshold_percent: f64,
}

impl RegressionThreshold {
    pub fn new(regression_threshold_percent: f64) -> Self {
        Self {
            regression_threshold_percent,
        }
    }
}

fn default_execution_time_threshold() -> RegressionThreshold {
    RegressionThreshold::new(10.0)
}

fn default_cost_threshold() -> RegressionThreshold {
    RegressionThreshold::new(20.0)
}

/// Regression thresholds used by bottleneck detection
///
/// # Example TOML
/// ```toml
/// [bottleneck_thresholds.execution_time]
/// regression_threshold_percent = 10
///
/// [bottleneck_thresholds.cost]
/// regression_threshold_percent = 20
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BottleneckThresholds {
    #[serde(default = "default_execution_time_threshold")]
    pub execution_time: RegressionThreshold,

    #[serde(default = "default_cost_threshold")]
    pub cost: RegressionThreshold,
}

impl Default for BottleneckThresholds {
    fn default() -> Self {
        Self {
            execution_time: default_execution_time_threshold(),
            cost: default_cost_threshold(),
        }
    }
}

/// Weights combining regression signals into a 0-100 impact score
///
/// Each delta term is capped at 100% before weighting, so a score stays within
/// `[0, 100]` as long as the weights sum to at most 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactWeights {
    pub execution_time: f64,
    pub cost: f64,
    pub data_drift: f64,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            execution_time: 0.4,
            cost: 0.4,
            data_drift: 0.2,
        }
    }
}

impl ImpactWeights {
    pub fn sum(&self) -> f64 {
        self.execution_time + self.cost + self.data_drift
    }
}

/// Mapping from a KPI name to the report field(s) that carry it
///
/// A KPI either names one field (`metric_key`) or a group of fields
/// (`metric_keys`); both may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiDefinition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub units: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_key: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metric_keys: Vec<String>,

    /// Relative importance in reports (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl KpiDefinition {
    /// Single-field KPI
    pub fn single(metric_key: impl Into<String>) -> Self {
        Self {
            metric_key: Some(metric_key.into()),
            ..Self::default()
        }
    }

    /// Multi-field KPI
    pub fn multi<I, S>(metric_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            metric_keys: metric_keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}
