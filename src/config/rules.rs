use serde::{Deserialize, Serialize};

/// Severity tier shared by bottleneck results and rule declarations
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "critical")]
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule compares a model's metric value against its threshold
///
/// Both operators currently trigger on a strict `value > threshold` of the raw
/// metric value. `PercentGreaterThan` rules are expected to be fed metrics that
/// are already expressed in percent.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    #[default]
    GreaterThan,
    PercentGreaterThan,
}

impl ComparisonOperator {
    /// Whether `value` triggers a rule declared with `threshold`
    pub fn is_triggered(&self, value: f64, threshold: f64) -> bool {
        match self {
            ComparisonOperator::GreaterThan => value > threshold,
            // TODO: decide whether percent rules should compare against a baseline
            // value once complexity metrics carry both snapshots.
            ComparisonOperator::PercentGreaterThan => value > threshold,
        }
    }
}

/// Declarative optimization rule loaded from TOML or JSON
///
/// # Example TOML
/// ```toml
/// [[optimization_rules]]
/// rule_id = "HIGH_JOIN_COUNT"
/// name = "High JOIN Count Detection"
/// metric = "join_count"
/// threshold = 5
/// comparison_operator = "greater_than"
/// severity = "MEDIUM"
/// optimization_technique = "JOIN Consolidation & Materialization"
/// sql_pattern_suggestion = ["Create materialized view for JOIN result"]
/// rationale = "Multiple JOINs prevent the optimizer from finding good plans."
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OptimizationRule {
    /// Unique identifier (e.g., "HIGH_JOIN_COUNT")
    pub rule_id: String,

    /// Human-readable rule name
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Complexity metric key the rule inspects (e.g., "join_count")
    pub metric: String,

    /// Rule fires when the metric value strictly exceeds this
    pub threshold: f64,

    #[serde(default)]
    pub comparison_operator: ComparisonOperator,

    /// Declared severity of the underlying problem
    pub severity: Severity,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub recommendation: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_items: Vec<String>,

    #[serde(default)]
    pub optimization_technique: String,

    /// Ordered list of concrete SQL rewrites to suggest
    #[serde(default)]
    pub sql_pattern_suggestion: Vec<String>,

    #[serde(default)]
    pub rationale: String,
}

impl OptimizationRule {
    /// Check whether this rule fires for the given metric value
    pub fn is_triggered_by(&self, value: f64) -> bool {
        self.comparison_operator.is_triggered(value, self.threshold)
    }
}
