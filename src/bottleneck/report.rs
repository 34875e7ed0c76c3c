// Bottleneck ranking and report formatting

use crate::bottleneck::detector::{BottleneckResult, Bottlenecks};
use crate::config::Severity;
use serde::{Deserialize, Serialize};

/// Default number of entries kept in a bottleneck summary
pub const DEFAULT_TOP_N: usize = 10;

/// Serializable bottleneck section of an analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckReport {
    pub total_models_analyzed: usize,

    /// Models with at least one regression flag
    pub models_with_bottlenecks: usize,

    /// Names of CRITICAL models, in impact order
    pub critical_bottlenecks: Vec<String>,

    /// Top-N models by impact score
    pub summary: Vec<BottleneckResult>,

    pub all_bottlenecks: Bottlenecks,
}

/// Rank models by impact score, highest first
///
/// Ties keep model-name order.
pub fn rank_bottlenecks_by_impact(bottlenecks: &Bottlenecks) -> Vec<&BottleneckResult> {
    let mut ranked: Vec<&BottleneckResult> = bottlenecks.values().collect();
    ranked.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));
    ranked
}

/// Top `top_n` bottlenecks by impact score
pub fn generate_bottleneck_summary(
    bottlenecks: &Bottlenecks,
    top_n: usize,
) -> Vec<BottleneckResult> {
    let summary: Vec<BottleneckResult> = rank_bottlenecks_by_impact(bottlenecks)
        .into_iter()
        .take(top_n)
        .cloned()
        .collect();

    tracing::info!(
        "Bottleneck summary: top {} of {} models",
        summary.len(),
        bottlenecks.len()
    );

    summary
}

/// Wrap counts, critical model names, the summary and full details
pub fn format_bottleneck_output(
    bottlenecks: &Bottlenecks,
    summary: Vec<BottleneckResult>,
) -> BottleneckReport {
    let critical_bottlenecks = rank_bottlenecks_by_impact(bottlenecks)
        .into_iter()
        .filter(|b| b.severity == Severity::Critical)
        .map(|b| b.model_name.clone())
        .collect();

    BottleneckReport {
        total_models_analyzed: bottlenecks.len(),
        models_with_bottlenecks: bottlenecks.values().filter(|b| b.is_bottleneck()).count(),
        critical_bottlenecks,
        summary,
        all_bottlenecks: bottlenecks.clone(),
    }
}
