// Comparison pipeline: deltas → bottlenecks → recommendations → ranking

use crate::bottleneck::{
    detect_bottlenecks, format_bottleneck_output, generate_bottleneck_summary, BottleneckReport,
};
use crate::complexity::complexity_from_snapshot;
use crate::config::AnalysisConfig;
use crate::delta::{calculate_model_deltas, summarize_deltas, DeltaSummary, ModelDeltas};
use crate::recommendation::{
    generate_recommendation_summary, generate_recommendations, ComplexityMetrics, Recommendations,
    RecommendationSummary,
};
use crate::snapshot::ModelKpis;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full result of comparing two snapshots
///
/// Carries no timestamps: identical inputs always produce identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonAnalysis {
    pub model_deltas: ModelDeltas,
    pub delta_summary: DeltaSummary,
    pub bottlenecks: BottleneckReport,
    pub recommendations: Recommendations,
    pub recommendation_summary: RecommendationSummary,
}

impl ComparisonAnalysis {
    /// Pretty-printed JSON, as written to `analysis.json`
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Runs comparisons with an injected, immutable configuration
///
/// # Example
/// ```
/// use modeldiff::analysis::ComparisonEngine;
/// use modeldiff::config::AnalysisConfig;
/// use modeldiff::snapshot::ModelKpis;
/// use serde_json::json;
///
/// let baseline: ModelKpis = serde_json::from_value(json!({
///     "fct_orders": {"execution_time": 10.0, "cost": 4.0, "join_count": 7}
/// })).unwrap();
/// let candidate: ModelKpis = serde_json::from_value(json!({
///     "fct_orders": {"execution_time": 15.0, "cost": 4.0, "join_count": 7}
/// })).unwrap();
///
/// let engine = ComparisonEngine::new(AnalysisConfig::bundled().unwrap());
/// let analysis = engine.run_from_snapshots(&baseline, &candidate, 10);
///
/// assert_eq!(analysis.bottlenecks.models_with_bottlenecks, 1);
/// assert_eq!(analysis.recommendation_summary.total_recommendations, 1);
/// ```
#[derive(Debug, Clone)]
pub struct ComparisonEngine {
    config: AnalysisConfig,
}

impl ComparisonEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Compare two snapshots using caller-supplied complexity metrics
    ///
    /// `top_n` bounds both the bottleneck summary and the top recommendation
    /// list. 0 keeps every entry in both.
    pub fn run(
        &self,
        baseline: &ModelKpis,
        candidate: &ModelKpis,
        complexity: &BTreeMap<String, ComplexityMetrics>,
        top_n: usize,
    ) -> ComparisonAnalysis {
        tracing::info!(
            "Comparing snapshots: {} baseline models, {} candidate models",
            baseline.len(),
            candidate.len()
        );

        let model_deltas = calculate_model_deltas(baseline, candidate, &self.config);
        let delta_summary = summarize_deltas(&model_deltas);

        let limit = (top_n > 0).then_some(top_n);

        let detected = detect_bottlenecks(&model_deltas, &self.config);
        let summary = generate_bottleneck_summary(&detected, limit.unwrap_or(detected.len()));

        let recommendations = generate_recommendations(&detected, complexity, &self.config);
        let recommendation_summary = generate_recommendation_summary(&recommendations, limit);

        let bottlenecks = format_bottleneck_output(&detected, summary);

        tracing::info!(
            "Analysis complete: {} bottlenecks ({} critical), {} recommendations",
            bottlenecks.models_with_bottlenecks,
            bottlenecks.critical_bottlenecks.len(),
            recommendation_summary.total_recommendations
        );

        ComparisonAnalysis {
            model_deltas,
            delta_summary,
            bottlenecks,
            recommendations,
            recommendation_summary,
        }
    }

    /// Compare two snapshots, reading complexity from the candidate's records
    pub fn run_from_snapshots(
        &self,
        baseline: &ModelKpis,
        candidate: &ModelKpis,
        top_n: usize,
    ) -> ComparisonAnalysis {
        let complexity = complexity_from_snapshot(candidate);
        self.run(baseline, candidate, &complexity, top_n)
    }
}
