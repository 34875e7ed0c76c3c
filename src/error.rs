//! Configuration errors
//!
//! Data-quality problems never surface here: they degrade to a status string on
//! the affected `DeltaResult`. Only a malformed configuration is an error.

use thiserror::Error;

/// Errors raised while validating an [`AnalysisConfig`](crate::config::AnalysisConfig)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidThreshold { field: String, value: f64 },

    #[error("impact weight '{name}' must be a finite, non-negative number, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("impact weights must sum to at most 1.0, got {sum}")]
    WeightSumExceeded { sum: f64 },

    #[error("optimization rule at position {index} has an empty rule_id")]
    EmptyRuleId { index: usize },

    #[error("optimization rule '{rule_id}' has an empty metric")]
    EmptyRuleMetric { rule_id: String },

    #[error("duplicate optimization rule id '{0}'")]
    DuplicateRuleId(String),

    #[error("pricing value '{field}' must be positive, got {value}")]
    InvalidPricing { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
