// Per-model delta aggregation
//
// Unions the baseline and candidate model sets, computes one delta map per
// model present in both, and tags models present in only one snapshot.

use crate::config::AnalysisConfig;
use crate::delta::calculator::{calculate_delta, DeltaOutcome, DeltaResult};
use crate::snapshot::{self, KpiMap, ModelKpis, NON_METRIC_FIELDS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Metric name → delta for one model
pub type MetricDeltas = BTreeMap<String, DeltaResult>;

/// Model name → delta set, for a whole comparison
pub type ModelDeltas = BTreeMap<String, ModelDeltaSet>;

/// Delta set for one model
///
/// Serializes to the metric map for models in both snapshots, and to
/// `{"_status": "new_model"}` / `{"_status": "removed_model"}` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ModelDeltaSetRepr", from = "ModelDeltaSetRepr")]
pub enum ModelDeltaSet {
    /// Present in both snapshots
    Common(MetricDeltas),
    /// Present only in the candidate snapshot
    NewModel,
    /// Present only in the baseline snapshot
    RemovedModel,
}

impl ModelDeltaSet {
    /// Metric deltas, for models present in both snapshots
    pub fn metrics(&self) -> Option<&MetricDeltas> {
        match self {
            ModelDeltaSet::Common(metrics) => Some(metrics),
            _ => None,
        }
    }

    /// "new_model" / "removed_model", or `None` for common models
    pub fn lifecycle_status(&self) -> Option<&'static str> {
        match self {
            ModelDeltaSet::Common(_) => None,
            ModelDeltaSet::NewModel => Some("new_model"),
            ModelDeltaSet::RemovedModel => Some("removed_model"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Lifecycle {
    NewModel,
    RemovedModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ModelDeltaSetRepr {
    Lifecycle {
        #[serde(rename = "_status")]
        status: Lifecycle,
    },
    Metrics(MetricDeltas),
}

impl From<ModelDeltaSet> for ModelDeltaSetRepr {
    fn from(set: ModelDeltaSet) -> Self {
        match set {
            ModelDeltaSet::Common(metrics) => ModelDeltaSetRepr::Metrics(metrics),
            ModelDeltaSet::NewModel => ModelDeltaSetRepr::Lifecycle {
                status: Lifecycle::NewModel,
            },
            ModelDeltaSet::RemovedModel => ModelDeltaSetRepr::Lifecycle {
                status: Lifecycle::RemovedModel,
            },
        }
    }
}

impl From<ModelDeltaSetRepr> for ModelDeltaSet {
    fn from(repr: ModelDeltaSetRepr) -> Self {
        match repr {
            ModelDeltaSetRepr::Metrics(metrics) => ModelDeltaSet::Common(metrics),
            ModelDeltaSetRepr::Lifecycle {
                status: Lifecycle::NewModel,
            } => ModelDeltaSet::NewModel,
            ModelDeltaSetRepr::Lifecycle {
                status: Lifecycle::RemovedModel,
            } => ModelDeltaSet::RemovedModel,
        }
    }
}

/// Calculate deltas for every comparable KPI of one model
///
/// With `kpi_definitions` configured, exactly the listed fields that are
/// numeric in both records are compared. Otherwise every field numeric in both
/// records (except identifiers such as `data_hash` or `timestamp`) is compared.
///
/// When `check_data_hash` is set and both records carry differing output
/// hashes, every returned delta is annotated as data drift.
pub fn calculate_all_deltas(
    baseline: &KpiMap,
    candidate: &KpiMap,
    config: &AnalysisConfig,
    check_data_hash: bool,
) -> MetricDeltas {
    let data_drift = check_data_hash && snapshot::hashes_differ(baseline, candidate);
    if data_drift {
        tracing::warn!(
            "Data drift detected: hash mismatch (baseline: {}..., candidate: {}...)",
            hash_prefix(snapshot::output_hash(baseline)),
            hash_prefix(snapshot::output_hash(candidate))
        );
    }

    let mut deltas = MetricDeltas::new();
    let mut compare = |field: &str, direction_metric: &str| {
        let (Some(b), Some(c)) = (
            snapshot::numeric(baseline, field),
            snapshot::numeric(candidate, field),
        ) else {
            tracing::debug!("Skipping {}: missing or non-numeric value", field);
            return;
        };
        let outcome = DeltaOutcome::from_calculation(
            calculate_delta(Some(b), Some(c), field),
            direction_metric,
            &config.lower_is_better,
        );
        deltas.insert(field.to_string(), DeltaResult::new(outcome, data_drift));
    };

    if config.kpi_definitions.is_empty() {
        let fields: BTreeSet<&str> = baseline
            .keys()
            .chain(candidate.keys())
            .map(String::as_str)
            .filter(|k| !NON_METRIC_FIELDS.contains(k))
            .collect();
        for field in fields {
            compare(field, field);
        }
    } else {
        for (kpi_name, definition) in &config.kpi_definitions {
            tracing::debug!("Calculating delta for KPI: {}", kpi_name);
            // A single-field KPI takes its direction from the KPI name, so a
            // field like `execution_time_seconds` still counts as lower-is-better.
            if let Some(key) = &definition.metric_key {
                compare(key, kpi_name);
            }
            for key in &definition.metric_keys {
                compare(key, key);
            }
        }
    }

    deltas
}

fn hash_prefix(hash: Option<&str>) -> &str {
    let hash = hash.unwrap_or_default();
    match hash.char_indices().nth(8) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}

/// Calculate deltas for all models, tagging new and removed ones
///
/// # Example
/// ```
/// use modeldiff::config::AnalysisConfig;
/// use modeldiff::delta::{calculate_model_deltas, ModelDeltaSet};
/// use modeldiff::snapshot::ModelKpis;
/// use serde_json::json;
///
/// let baseline: ModelKpis = serde_json::from_value(json!({
///     "model_a": {"execution_time": 10.0}
/// })).unwrap();
/// let candidate: ModelKpis = serde_json::from_value(json!({
///     "model_a": {"execution_time": 9.0},
///     "model_b": {"execution_time": 5.0}
/// })).unwrap();
///
/// let deltas = calculate_model_deltas(&baseline, &candidate, &AnalysisConfig::default());
/// let a = deltas["model_a"].metrics().unwrap();
/// assert_eq!(a["execution_time"].delta(), Some(-10.0));
/// assert_eq!(deltas["model_b"], ModelDeltaSet::NewModel);
/// ```
pub fn calculate_model_deltas(
    baseline_models: &ModelKpis,
    candidate_models: &ModelKpis,
    config: &AnalysisConfig,
) -> ModelDeltas {
    let all_models: BTreeSet<&String> = baseline_models
        .keys()
        .chain(candidate_models.keys())
        .collect();

    tracing::info!(
        "Processing {} models (baseline: {}, candidate: {})",
        all_models.len(),
        baseline_models.len(),
        candidate_models.len()
    );

    all_models
        .into_iter()
        .map(|model_name| {
            let set = match (
                baseline_models.get(model_name),
                candidate_models.get(model_name),
            ) {
                (Some(baseline), Some(candidate)) => {
                    tracing::debug!("Calculating deltas for model: {}", model_name);
                    ModelDeltaSet::Common(calculate_all_deltas(baseline, candidate, config, true))
                }
                (None, _) => {
                    tracing::info!("New model detected: {}", model_name);
                    ModelDeltaSet::NewModel
                }
                (Some(_), None) => {
                    tracing::info!("Removed model detected: {}", model_name);
                    ModelDeltaSet::RemovedModel
                }
            };
            (model_name.clone(), set)
        })
        .collect()
}
