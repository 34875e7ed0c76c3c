// Declarative analysis configuration
//
// Thresholds, impact weights, KPI definitions and optimization rules are data,
// not code: they are loaded from TOML/JSON (or the bundled rules-default.toml)
// and handed to the engine as an immutable value.

mod overrides;
mod rules;
mod thresholds;

pub use overrides::{ConfigOverrides, CTE_RULE_ID, JOIN_RULE_ID, WINDOW_FUNCTION_RULE_ID};
pub use rules::{ComparisonOperator, OptimizationRule, Severity};
pub use thresholds::{
    BottleneckThresholds, ImpactWeights, KpiDefinition, RegressionThreshold,
    DEFAULT_LOWER_IS_BETTER,
};

use crate::error::ConfigError;
use crate::pricing::PricingConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

const BUNDLED_RULES_TOML: &str = include_str!("../../rules-default.toml");

fn default_lower_is_better() -> Vec<String> {
    DEFAULT_LOWER_IS_BETTER
        .iter()
        .map(|m| m.to_string())
        .collect()
}

/// Fully-resolved configuration for a comparison run
///
/// `Default` carries the built-in thresholds (10% execution time, 20% cost),
/// the 40/40/20 impact weights and no KPI definitions or rules. Use
/// [`AnalysisConfig::bundled`] for the shipped rule pack.
///
/// # Example
/// ```
/// use modeldiff::config::AnalysisConfig;
///
/// let config = AnalysisConfig::from_toml_str(r#"
///     [bottleneck_thresholds.execution_time]
///     regression_threshold_percent = 15
/// "#).unwrap();
/// assert_eq!(config.execution_time_threshold(), 15.0);
/// assert_eq!(config.cost_threshold(), 20.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// KPI name → report field(s); empty means "infer numeric fields"
    #[serde(default)]
    pub kpi_definitions: BTreeMap<String, KpiDefinition>,

    #[serde(default)]
    pub bottleneck_thresholds: BottleneckThresholds,

    #[serde(default)]
    pub impact_weights: ImpactWeights,

    /// Metrics where a reduction is an improvement
    #[serde(default = "default_lower_is_better")]
    pub lower_is_better: Vec<String>,

    /// Evaluated in declaration order
    #[serde(default)]
    pub optimization_rules: Vec<OptimizationRule>,

    #[serde(default)]
    pub pricing: PricingConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            kpi_definitions: BTreeMap::new(),
            bottleneck_thresholds: BottleneckThresholds::default(),
            impact_weights: ImpactWeights::default(),
            lower_is_better: default_lower_is_better(),
            optimization_rules: Vec::new(),
            pricing: PricingConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML configuration document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse TOML analysis configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .context("Failed to parse JSON analysis configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid TOML, or fails
    /// [`validate`](Self::validate).
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    /// Load the rule pack compiled into the crate (rules-default.toml)
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_RULES_TOML)
            .context("Failed to parse embedded rules-default.toml")
    }

    /// Return a copy with `overrides` applied
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> Self {
        overrides.apply(self.clone())
    }

    pub fn execution_time_threshold(&self) -> f64 {
        self.bottleneck_thresholds
            .execution_time
            .regression_threshold_percent
    }

    pub fn cost_threshold(&self) -> f64 {
        self.bottleneck_thresholds.cost.regression_threshold_percent
    }

    /// Look up a rule by id
    pub fn rule(&self, rule_id: &str) -> Option<&OptimizationRule> {
        self.optimization_rules.iter().find(|r| r.rule_id == rule_id)
    }

    pub fn is_lower_better(&self, metric: &str) -> bool {
        self.lower_is_better.iter().any(|m| m == metric)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let thresholds = [
            (
                "bottleneck_thresholds.execution_time.regression_threshold_percent",
                self.execution_time_threshold(),
            ),
            (
                "bottleneck_thresholds.cost.regression_threshold_percent",
                self.cost_threshold(),
            ),
        ];
        for (field, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        let weights = [
            ("execution_time", self.impact_weights.execution_time),
            ("cost", self.impact_weights.cost),
            ("data_drift", self.impact_weights.data_drift),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let sum = self.impact_weights.sum();
        // Tolerate float noise from decimal weights like 0.1 + 0.2
        if sum > 1.0 + 1e-9 {
            return Err(ConfigError::WeightSumExceeded { sum });
        }

        let mut seen = HashSet::new();
        for (index, rule) in self.optimization_rules.iter().enumerate() {
            if rule.rule_id.trim().is_empty() {
                return Err(ConfigError::EmptyRuleId { index });
            }
            if rule.metric.trim().is_empty() {
                return Err(ConfigError::EmptyRuleMetric {
                    rule_id: rule.rule_id.clone(),
                });
            }
            if !rule.threshold.is_finite() || rule.threshold < 0.0 {
                return Err(ConfigError::InvalidThreshold {
                    field: format!("optimization_rules.{}.threshold", rule.rule_id),
                    value: rule.threshold,
                });
            }
            if !seen.insert(rule.rule_id.as_str()) {
                return Err(ConfigError::DuplicateRuleId(rule.rule_id.clone()));
            }
        }

        let pricing = [
            ("pricing.standard.cost_per_credit", self.pricing.standard.cost_per_credit),
            ("pricing.enterprise.cost_per_credit", self.pricing.enterprise.cost_per_credit),
            ("pricing.bytes_per_gb", self.pricing.bytes_per_gb),
            ("pricing.gb_per_credit", self.pricing.gb_per_credit),
        ];
        for (field, value) in pricing {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidPricing { field, value });
            }
        }

        Ok(())
    }
}
