// Global ranking and summary of recommendations

use crate::recommendation::engine::{Recommendation, Recommendations};
use crate::recommendation::priority::Priority;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable recommendation section of an analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub total_recommendations: usize,
    pub models_with_recommendations: usize,
    pub high_priority_count: usize,
    pub medium_priority_count: usize,
    pub low_priority_count: usize,

    /// Count per tier; every tier is present, zero included
    pub priority_breakdown: BTreeMap<Priority, usize>,

    pub top_recommendations: Vec<Recommendation>,
}

/// All recommendations, sorted by (priority score, rule id) descending
pub fn rank_recommendations_by_priority(recommendations: &Recommendations) -> Vec<&Recommendation> {
    let mut ranked: Vec<&Recommendation> = recommendations.values().flatten().collect();
    ranked.sort_by(|a, b| {
        b.priority_score
            .total_cmp(&a.priority_score)
            .then_with(|| b.rule_id.cmp(&a.rule_id))
    });
    ranked
}

/// Counts per priority tier plus the top `top_n` recommendations
///
/// `None` or `Some(0)` keeps every recommendation in the top list.
pub fn generate_recommendation_summary(
    recommendations: &Recommendations,
    top_n: Option<usize>,
) -> RecommendationSummary {
    let ranked = rank_recommendations_by_priority(recommendations);

    let mut priority_breakdown: BTreeMap<Priority, usize> =
        [Priority::High, Priority::Medium, Priority::Low]
            .into_iter()
            .map(|p| (p, 0))
            .collect();
    for rec in &ranked {
        *priority_breakdown.entry(rec.priority).or_default() += 1;
    }

    let limit = top_n.filter(|n| *n > 0).unwrap_or(ranked.len());
    let top_recommendations = ranked.iter().take(limit).map(|r| (*r).clone()).collect();

    let count = |p: Priority| priority_breakdown.get(&p).copied().unwrap_or(0);
    let summary = RecommendationSummary {
        total_recommendations: ranked.len(),
        models_with_recommendations: recommendations.len(),
        high_priority_count: count(Priority::High),
        medium_priority_count: count(Priority::Medium),
        low_priority_count: count(Priority::Low),
        priority_breakdown,
        top_recommendations,
    };

    tracing::info!(
        "Recommendation summary: {} total ({} HIGH, {} MEDIUM, {} LOW)",
        summary.total_recommendations,
        summary.high_priority_count,
        summary.medium_priority_count,
        summary.low_priority_count
    );

    summary
}
