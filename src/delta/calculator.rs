// Percentage delta calculation for a single (baseline, candidate) pair
//
// delta = ((candidate - baseline) / baseline) * 100, rounded to 2 decimals.
// Bad input never panics or errors out: it degrades to a `DeltaIssue` that is
// carried as the result's status.

use crate::pricing::round_to;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Annotation attached to every delta of a model whose output hash changed
pub const DRIFT_ANNOTATION: &str = "⚠ data drift detected";

/// Substring that identifies a drift annotation
pub const DRIFT_MARKER: &str = "data drift";

const ERROR_STATUS_PREFIX: &str = "error: ";

/// Why a delta could not be computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaIssue {
    /// Baseline value is zero (percentage change undefined)
    BaselineZero,
    /// Baseline or candidate value is missing
    NullValue,
    /// Arithmetic produced a non-finite value
    Error { message: String },
}

impl fmt::Display for DeltaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaIssue::BaselineZero => f.write_str("N/A - baseline zero"),
            DeltaIssue::NullValue => f.write_str("null_value"),
            DeltaIssue::Error { message } => write!(f, "{}{}", ERROR_STATUS_PREFIX, message),
        }
    }
}

/// Whether a change is good or bad for its metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Rendered as "+"
    Improvement,
    /// Rendered as "-"
    Regression,
}

impl Direction {
    pub fn symbol(&self) -> &'static str {
        match self {
            Direction::Improvement => "+",
            Direction::Regression => "-",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Direction::Improvement),
            "-" => Some(Direction::Regression),
            _ => None,
        }
    }
}

/// Calculate the percentage change from `baseline` to `candidate`
///
/// # Example
/// ```
/// use modeldiff::delta::{calculate_delta, DeltaIssue};
///
/// assert_eq!(calculate_delta(Some(10.0), Some(15.0), "execution_time"), Ok(50.0));
/// assert_eq!(calculate_delta(Some(0.0), Some(5.0), "cost"), Err(DeltaIssue::BaselineZero));
/// assert_eq!(calculate_delta(None, Some(5.0), "cost"), Err(DeltaIssue::NullValue));
/// ```
pub fn calculate_delta(
    baseline: Option<f64>,
    candidate: Option<f64>,
    metric_name: &str,
) -> Result<f64, DeltaIssue> {
    let (Some(baseline), Some(candidate)) = (baseline, candidate) else {
        tracing::debug!(
            "Metric '{}' has null value(s): baseline={:?}, candidate={:?}",
            metric_name,
            baseline,
            candidate
        );
        return Err(DeltaIssue::NullValue);
    };

    if baseline == 0.0 {
        tracing::warn!("Metric '{}' delta skipped due to zero baseline", metric_name);
        return Err(DeltaIssue::BaselineZero);
    }

    let delta = ((candidate - baseline) / baseline) * 100.0;
    if !delta.is_finite() {
        tracing::error!(
            "Error calculating delta for '{}': baseline={}, candidate={}",
            metric_name,
            baseline,
            candidate
        );
        return Err(DeltaIssue::Error {
            message: format!(
                "non-finite delta (baseline={}, candidate={})",
                baseline, candidate
            ),
        });
    }

    Ok(round_to(delta, 2))
}

/// Determine whether `delta` is an improvement or a regression for `metric_name`
///
/// Metrics listed in `lower_is_better` improve when they shrink; all others
/// improve when they grow. Returns `None` ("N/A") when there is no delta.
pub fn determine_direction<S: AsRef<str>>(
    delta: Option<f64>,
    metric_name: &str,
    lower_is_better: &[S],
) -> Option<Direction> {
    let delta = delta?;

    let improves_on_reduction = lower_is_better.iter().any(|m| m.as_ref() == metric_name);
    let improved = if improves_on_reduction {
        delta < 0.0
    } else {
        delta > 0.0
    };

    Some(if improved {
        Direction::Improvement
    } else {
        Direction::Regression
    })
}

/// Outcome of a delta calculation
///
/// Only a successful calculation carries a delta and a direction, so a
/// "success without a value" cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub enum DeltaOutcome {
    Success { delta: f64, direction: Direction },
    BaselineZero,
    NullValue,
    Error { message: String },
}

impl DeltaOutcome {
    /// Combine a calculation result with the direction for its metric
    pub fn from_calculation<S: AsRef<str>>(
        calculation: Result<f64, DeltaIssue>,
        metric_name: &str,
        lower_is_better: &[S],
    ) -> Self {
        match calculation {
            Ok(delta) => {
                let direction = determine_direction(Some(delta), metric_name, lower_is_better)
                    .unwrap_or(Direction::Regression);
                DeltaOutcome::Success { delta, direction }
            }
            Err(DeltaIssue::BaselineZero) => DeltaOutcome::BaselineZero,
            Err(DeltaIssue::NullValue) => DeltaOutcome::NullValue,
            Err(DeltaIssue::Error { message }) => DeltaOutcome::Error { message },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeltaOutcome::Success { .. })
    }

    /// Status string: "success", "N/A - baseline zero", "null_value" or "error: <msg>"
    pub fn status(&self) -> String {
        match self {
            DeltaOutcome::Success { .. } => "success".to_string(),
            DeltaOutcome::BaselineZero => DeltaIssue::BaselineZero.to_string(),
            DeltaOutcome::NullValue => DeltaIssue::NullValue.to_string(),
            DeltaOutcome::Error { message } => DeltaIssue::Error {
                message: message.clone(),
            }
            .to_string(),
        }
    }
}

/// Delta of one metric for one model
///
/// Serializes to the flat `{delta, direction, status, annotation}` record used
/// in analysis reports; deserializing rejects records that break the
/// "delta present iff status is success" invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DeltaRecord", try_from = "DeltaRecord")]
pub struct DeltaResult {
    pub outcome: DeltaOutcome,
    pub annotation: Option<String>,
}

impl DeltaResult {
    /// Package a calculation, annotating drift or a non-success status
    pub fn new(outcome: DeltaOutcome, data_drift: bool) -> Self {
        let annotation = if data_drift {
            Some(DRIFT_ANNOTATION.to_string())
        } else if !outcome.is_success() {
            Some(format!("Status: {}", outcome.status()))
        } else {
            None
        };

        Self {
            outcome,
            annotation,
        }
    }

    pub fn delta(&self) -> Option<f64> {
        match self.outcome {
            DeltaOutcome::Success { delta, .. } => Some(delta),
            _ => None,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self.outcome {
            DeltaOutcome::Success { direction, .. } => Some(direction),
            _ => None,
        }
    }

    /// "+", "-" or "N/A"
    pub fn direction_symbol(&self) -> &'static str {
        self.direction().map_or("N/A", |d| d.symbol())
    }

    pub fn status(&self) -> String {
        self.outcome.status()
    }

    /// Whether this result carries the drift annotation
    pub fn has_drift(&self) -> bool {
        self.annotation
            .as_deref()
            .is_some_and(|a| a.contains(DRIFT_MARKER))
    }
}

/// Wire form of [`DeltaResult`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DeltaRecord {
    delta: Option<f64>,
    direction: String,
    status: String,
    annotation: Option<String>,
}

impl From<DeltaResult> for DeltaRecord {
    fn from(result: DeltaResult) -> Self {
        Self {
            delta: result.delta(),
            direction: result.direction_symbol().to_string(),
            status: result.status(),
            annotation: result.annotation,
        }
    }
}

impl TryFrom<DeltaRecord> for DeltaResult {
    type Error = String;

    fn try_from(record: DeltaRecord) -> Result<Self, Self::Error> {
        let outcome = match record.status.as_str() {
            "success" => {
                let delta = record
                    .delta
                    .ok_or_else(|| "status 'success' requires a delta".to_string())?;
                let direction = Direction::from_symbol(&record.direction).ok_or_else(|| {
                    format!(
                        "status 'success' requires direction '+' or '-', got '{}'",
                        record.direction
                    )
                })?;
                DeltaOutcome::Success { delta, direction }
            }
            other => {
                if record.delta.is_some() || record.direction != "N/A" {
                    return Err(format!(
                        "status '{}' must have a null delta and direction 'N/A'",
                        other
                    ));
                }
                match other {
                    "N/A - baseline zero" => DeltaOutcome::BaselineZero,
                    "null_value" => DeltaOutcome::NullValue,
                    _ => match other.strip_prefix(ERROR_STATUS_PREFIX) {
                        Some(message) => DeltaOutcome::Error {
                            message: message.to_string(),
                        },
                        None => return Err(format!("unknown delta status '{}'", other)),
                    },
                }
            }
        };

        Ok(Self {
            outcome,
            annotation: record.annotation,
        })
    }
}
