// Rule-based optimization recommendations
//
// Matches each analyzed model's structural complexity (join/CTE/window
// function counts) against the configured optimization rules and turns every
// triggered rule into a prioritized recommendation.

mod engine;
mod priority;
mod summary;

pub use engine::{
    find_matching_rules, generate_recommendations, generate_recommendations_for_model,
    ComplexityMetrics, Recommendation, Recommendations,
};
pub use priority::{
    calculate_priority_score, get_priority_level, Priority, COST_ESCALATION_BOOST,
    COST_ESCALATION_PERCENT,
};
pub use summary::{
    generate_recommendation_summary, rank_recommendations_by_priority, RecommendationSummary,
};
