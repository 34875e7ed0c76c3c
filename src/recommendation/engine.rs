// Rule matching and recommendation generation

use crate::bottleneck::{BottleneckResult, Bottlenecks};
use crate::config::{AnalysisConfig, OptimizationRule};
use crate::recommendation::priority::{calculate_priority_score, get_priority_level, Priority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complexity metric name → value for one model (join_count, cte_count, ...)
pub type ComplexityMetrics = BTreeMap<String, f64>;

/// Model name → recommendations, highest priority first
pub type Recommendations = BTreeMap<String, Vec<Recommendation>>;

/// One optimization recommendation, produced by one triggered rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub model_name: String,
    pub rule_id: String,
    pub rule_name: String,
    pub priority: Priority,

    /// 0-100 ranking value
    pub priority_score: f64,

    pub optimization_technique: String,
    pub sql_pattern_suggestion: Vec<String>,
    pub rationale: String,

    /// Impact score of the model's bottleneck result
    pub impact_score: f64,

    /// Metric that triggered the rule, with its value and the rule threshold
    pub complexity_metric: String,
    pub complexity_value: f64,
    pub threshold_value: f64,
}

/// Rules triggered by a model's complexity metrics, in declaration order
///
/// Rules whose metric is absent from `complexity_metrics` never match.
pub fn find_matching_rules<'a>(
    complexity_metrics: &ComplexityMetrics,
    config: &'a AnalysisConfig,
) -> Vec<&'a OptimizationRule> {
    config
        .optimization_rules
        .iter()
        .filter(|rule| {
            let Some(&value) = complexity_metrics.get(&rule.metric) else {
                return false;
            };
            let triggered = rule.is_triggered_by(value);
            if triggered {
                tracing::debug!(
                    "Rule triggered: {} ({}={} > {})",
                    rule.rule_id,
                    rule.metric,
                    value,
                    rule.threshold
                );
            }
            triggered
        })
        .collect()
}

/// Recommendations for one model, sorted by priority score descending
pub fn generate_recommendations_for_model(
    model_name: &str,
    bottleneck: &BottleneckResult,
    complexity_metrics: &ComplexityMetrics,
    config: &AnalysisConfig,
) -> Vec<Recommendation> {
    tracing::debug!("Generating recommendations for model: {}", model_name);

    let cost_regression = bottleneck.cost_regression();

    let mut recommendations: Vec<Recommendation> = find_matching_rules(complexity_metrics, config)
        .into_iter()
        .map(|rule| {
            let value = complexity_metrics.get(&rule.metric).copied().unwrap_or(0.0);
            let priority_score = calculate_priority_score(
                bottleneck.impact_score,
                value,
                rule.threshold,
                cost_regression,
            );
            let priority = get_priority_level(priority_score, cost_regression);

            tracing::debug!(
                "Created recommendation: {} (priority={}, score={:.2})",
                rule.rule_id,
                priority,
                priority_score
            );

            Recommendation {
                model_name: model_name.to_string(),
                rule_id: rule.rule_id.clone(),
                rule_name: rule.name.clone(),
                priority,
                priority_score,
                optimization_technique: rule.optimization_technique.clone(),
                sql_pattern_suggestion: rule.sql_pattern_suggestion.clone(),
                rationale: rule.rationale.clone(),
                impact_score: bottleneck.impact_score,
                complexity_metric: rule.metric.clone(),
                complexity_value: value,
                threshold_value: rule.threshold,
            }
        })
        .collect();

    if recommendations.is_empty() {
        tracing::debug!("No optimization rules triggered for {}", model_name);
    }

    // Stable: equal scores keep rule declaration order
    recommendations.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    recommendations
}

/// Recommendations for every analyzed model
///
/// Models without complexity metrics are skipped; models with no triggered
/// rule are left out of the result.
pub fn generate_recommendations(
    bottlenecks: &Bottlenecks,
    complexity_metrics: &BTreeMap<String, ComplexityMetrics>,
    config: &AnalysisConfig,
) -> Recommendations {
    tracing::info!(
        "Generating recommendations for {} models ({} with complexity metrics)",
        bottlenecks.len(),
        complexity_metrics.len()
    );

    let mut all = Recommendations::new();

    for (model_name, bottleneck) in bottlenecks {
        let metrics = match complexity_metrics.get(model_name) {
            Some(metrics) if !metrics.is_empty() => metrics,
            _ => {
                tracing::warn!("No complexity metrics found for model: {}", model_name);
                continue;
            }
        };

        let recommendations =
            generate_recommendations_for_model(model_name, bottleneck, metrics, config);
        if recommendations.is_empty() {
            continue;
        }

        tracing::info!(
            "Generated {} recommendations for {} (impact_score={:.2})",
            recommendations.len(),
            model_name,
            bottleneck.impact_score
        );
        all.insert(model_name.clone(), recommendations);
    }

    all
}
