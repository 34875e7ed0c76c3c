// Impact scoring and severity classification
//
// impact = Σ min(delta/100, 1) * weight over regressive execution-time and cost
// deltas, plus the drift weight when drift is present, scaled to 0-100.

use crate::config::{ImpactWeights, Severity};
use crate::pricing::round_to;

/// Weighted 0-100 impact score for one model
///
/// Only positive (regressive) deltas contribute, each capped at a 100%
/// regression before weighting.
///
/// # Example
/// ```
/// use modeldiff::bottleneck::calculate_impact_score;
/// use modeldiff::config::ImpactWeights;
///
/// let w = ImpactWeights::default();
/// assert_eq!(calculate_impact_score(Some(15.0), None, false, &w), 6.0);
/// assert_eq!(calculate_impact_score(Some(15.0), Some(25.0), true, &w), 36.0);
/// ```
pub fn calculate_impact_score(
    exec_delta: Option<f64>,
    cost_delta: Option<f64>,
    drift_present: bool,
    weights: &ImpactWeights,
) -> f64 {
    let mut score = 0.0;

    if let Some(delta) = exec_delta.filter(|d| *d > 0.0) {
        let contribution = (delta / 100.0).min(1.0) * weights.execution_time;
        tracing::debug!(
            "Execution time contribution: {:.4} (delta={:.2}%)",
            contribution,
            delta
        );
        score += contribution;
    }

    if let Some(delta) = cost_delta.filter(|d| *d > 0.0) {
        let contribution = (delta / 100.0).min(1.0) * weights.cost;
        tracing::debug!("Cost contribution: {:.4} (delta={:.2}%)", contribution, delta);
        score += contribution;
    }

    if drift_present {
        tracing::debug!("Data drift contribution: {:.4}", weights.data_drift);
        score += weights.data_drift;
    }

    let normalized = round_to(score * 100.0, 2);
    tracing::debug!("Impact score: {:.2} (raw={:.4})", normalized, score);
    normalized
}

/// Severity tier from the regression checks
///
/// An execution-time regression is HIGH, or CRITICAL when drift is also
/// present. Otherwise a cost regression is MEDIUM and anything else LOW.
pub fn classify_severity(exec_regression: bool, cost_regression: bool, drift: bool) -> Severity {
    match (exec_regression, cost_regression) {
        (true, _) if drift => Severity::Critical,
        (true, _) => Severity::High,
        (false, true) => Severity::Medium,
        (false, false) => Severity::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w() -> ImpactWeights {
        ImpactWeights::default()
    }

    #[test]
    fn test_exec_only() {
        assert_eq!(calculate_impact_score(Some(15.0), None, false, &w()), 6.0);
    }

    #[test]
    fn test_improvements_contribute_nothing() {
        assert_eq!(
            calculate_impact_score(Some(-50.0), Some(-10.0), false, &w()),
            0.0
        );
    }

    #[test]
    fn test_drift_only() {
        assert_eq!(calculate_impact_score(None, None, true, &w()), 20.0);
    }

    #[test]
    fn test_huge_regression_is_capped() {
        assert_eq!(
            calculate_impact_score(Some(10_000.0), Some(10_000.0), true, &w()),
            100.0
        );
        assert_eq!(calculate_impact_score(Some(10_000.0), None, false, &w()), 40.0);
    }

    #[test]
    fn test_custom_weights() {
        let weights = ImpactWeights {
            execution_time: 0.7,
            cost: 0.2,
            data_drift: 0.1,
        };
        assert_eq!(
            calculate_impact_score(Some(50.0), Some(50.0), false, &weights),
            45.0
        );
    }

    #[test]
    fn test_severity_table() {
        assert_eq!(classify_severity(true, false, true), Severity::Critical);
        assert_eq!(classify_severity(true, true, true), Severity::Critical);
        assert_eq!(classify_severity(true, false, false), Severity::High);
        assert_eq!(classify_severity(true, true, false), Severity::High);
        assert_eq!(classify_severity(false, true, false), Severity::Medium);
        assert_eq!(classify_severity(false, true, true), Severity::Medium);
        assert_eq!(classify_severity(false, false, true), Severity::Low);
        assert_eq!(classify_severity(false, false, false), Severity::Low);
    }
}
