// Priority scoring for recommendations
//
// score = (impact / 100) * (complexity / threshold) * 100, plus 25 when cost
// regressed by more than 20%, capped at 100.

use crate::pricing::round_to;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cost regression (percent) above which a recommendation is always HIGH
pub const COST_ESCALATION_PERCENT: f64 = 20.0;

/// Points added to the priority score for an escalated cost regression
pub const COST_ESCALATION_BOOST: f64 = 25.0;

/// Recommendation priority tier
///
/// Ordered so that `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn cost_escalated(cost_regression: Option<f64>) -> bool {
    cost_regression.is_some_and(|c| c > COST_ESCALATION_PERCENT)
}

/// Priority score (0-100) for a triggered rule
///
/// A non-positive `rule_threshold` yields 0.
///
/// # Example
/// ```
/// use modeldiff::recommendation::calculate_priority_score;
///
/// // 80 * (7 / 5) = 112, capped
/// assert_eq!(calculate_priority_score(80.0, 7.0, 5.0, None), 100.0);
/// assert_eq!(calculate_priority_score(50.0, 6.0, 5.0, None), 60.0);
/// assert_eq!(calculate_priority_score(10.0, 6.0, 5.0, Some(30.0)), 37.0);
/// ```
pub fn calculate_priority_score(
    impact_score: f64,
    complexity_value: f64,
    rule_threshold: f64,
    cost_regression: Option<f64>,
) -> f64 {
    if rule_threshold <= 0.0 {
        return 0.0;
    }

    let complexity_ratio = complexity_value / rule_threshold;
    let mut score = (impact_score / 100.0) * complexity_ratio * 100.0;

    if cost_escalated(cost_regression) {
        tracing::debug!(
            "Cost regression boost (+{}): {:.2} -> {:.2}",
            COST_ESCALATION_BOOST,
            score,
            score + COST_ESCALATION_BOOST
        );
        score += COST_ESCALATION_BOOST;
    }

    let score = round_to(score.min(100.0), 2);
    tracing::debug!(
        "Priority score: {:.2} (impact={:.2}, complexity_ratio={:.2})",
        score,
        impact_score,
        complexity_ratio
    );
    score
}

/// Priority tier for a score
///
/// A cost regression above 20% forces HIGH regardless of the score.
pub fn get_priority_level(priority_score: f64, cost_regression: Option<f64>) -> Priority {
    if cost_escalated(cost_regression) || priority_score > 66.0 {
        Priority::High
    } else if priority_score >= 33.0 {
        Priority::Medium
    } else {
        Priority::Low
    }
}
