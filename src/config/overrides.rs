// Explicit configuration overrides
//
// The engine never reads process-wide state. Callers that want the
// BENCHMARK_* environment variables to apply collect them into a
// `ConfigOverrides` and fold that into an `AnalysisConfig` before analysis.

use crate::config::AnalysisConfig;
use std::str::FromStr;

const TIME_REGRESSION_THRESHOLD: &str = "BENCHMARK_TIME_REGRESSION_THRESHOLD";
const COST_REGRESSION_THRESHOLD: &str = "BENCHMARK_COST_REGRESSION_THRESHOLD";
const STANDARD_COST_PER_CREDIT: &str = "BENCHMARK_STANDARD_COST_PER_CREDIT";
const ENTERPRISE_COST_PER_CREDIT: &str = "BENCHMARK_ENTERPRISE_COST_PER_CREDIT";
const JOIN_THRESHOLD: &str = "BENCHMARK_JOIN_THRESHOLD";
const CTE_THRESHOLD: &str = "BENCHMARK_CTE_THRESHOLD";
const WINDOW_FUNCTION_THRESHOLD: &str = "BENCHMARK_WINDOW_FUNCTION_THRESHOLD";

/// Rule ids whose thresholds can be overridden
pub const JOIN_RULE_ID: &str = "HIGH_JOIN_COUNT";
pub const CTE_RULE_ID: &str = "HIGH_CTE_COUNT";
pub const WINDOW_FUNCTION_RULE_ID: &str = "HIGH_WINDOW_FUNCTION_COUNT";

/// Optional replacements for individual configuration values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub execution_time_threshold: Option<f64>,
    pub cost_threshold: Option<f64>,
    pub standard_cost_per_credit: Option<f64>,
    pub enterprise_cost_per_credit: Option<f64>,
    pub join_threshold: Option<u32>,
    pub cte_threshold: Option<u32>,
    pub window_function_threshold: Option<u32>,
}

impl ConfigOverrides {
    /// Collect overrides from `BENCHMARK_*` key/value pairs
    ///
    /// Unknown keys are ignored. Values that fail to parse are skipped with a
    /// warning, leaving the configured value in place.
    ///
    /// # Example
    /// ```
    /// use modeldiff::config::ConfigOverrides;
    ///
    /// let overrides = ConfigOverrides::from_vars([
    ///     ("BENCHMARK_TIME_REGRESSION_THRESHOLD".to_string(), "15".to_string()),
    ///     ("BENCHMARK_JOIN_THRESHOLD".to_string(), "not-a-number".to_string()),
    /// ]);
    /// assert_eq!(overrides.execution_time_threshold, Some(15.0));
    /// assert_eq!(overrides.join_threshold, None);
    /// ```
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut overrides = Self::default();

        for (key, value) in vars {
            let key = key.as_ref();
            let value = value.as_ref();
            match key {
                TIME_REGRESSION_THRESHOLD => {
                    overrides.execution_time_threshold = parse_var(key, value)
                }
                COST_REGRESSION_THRESHOLD => overrides.cost_threshold = parse_var(key, value),
                STANDARD_COST_PER_CREDIT => {
                    overrides.standard_cost_per_credit = parse_var(key, value)
                }
                ENTERPRISE_COST_PER_CREDIT => {
                    overrides.enterprise_cost_per_credit = parse_var(key, value)
                }
                JOIN_THRESHOLD => overrides.join_threshold = parse_var(key, value),
                CTE_THRESHOLD => overrides.cte_threshold = parse_var(key, value),
                WINDOW_FUNCTION_THRESHOLD => {
                    overrides.window_function_threshold = parse_var(key, value)
                }
                _ => {}
            }
        }

        overrides
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply these overrides, returning the updated configuration
    pub fn apply(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(v) = self.execution_time_threshold {
            config
                .bottleneck_thresholds
                .execution_time
                .regression_threshold_percent = v;
        }
        if let Some(v) = self.cost_threshold {
            config.bottleneck_thresholds.cost.regression_threshold_percent = v;
        }
        if let Some(v) = self.standard_cost_per_credit {
            config.pricing.standard.cost_per_credit = v;
        }
        if let Some(v) = self.enterprise_cost_per_credit {
            config.pricing.enterprise.cost_per_credit = v;
        }

        let rule_thresholds = [
            (JOIN_RULE_ID, self.join_threshold),
            (CTE_RULE_ID, self.cte_threshold),
            (WINDOW_FUNCTION_RULE_ID, self.window_function_threshold),
        ];
        for (rule_id, threshold) in rule_thresholds {
            let Some(threshold) = threshold else {
                continue;
            };
            for rule in config
                .optimization_rules
                .iter_mut()
                .filter(|r| r.rule_id == rule_id)
            {
                rule.threshold = f64::from(threshold);
            }
        }

        config
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring override {}={:?}: not a valid number", key, value);
            None
        }
    }
}
