//! In-memory performance snapshots
//!
//! A snapshot maps each model name to its KPI record exactly as it was parsed
//! from report JSON. The engine only reads snapshots; it never validates their
//! schema.

use serde_json::Value;
use std::collections::BTreeMap;

/// KPI record for one model (field name → raw JSON value)
pub type KpiMap = BTreeMap<String, Value>;

/// A full snapshot (model name → KPI record)
pub type ModelKpis = BTreeMap<String, KpiMap>;

/// Fields that identify a record rather than measure it
pub const NON_METRIC_FIELDS: &[&str] = &["data_hash", "timestamp", "model_name", "query_hash"];

/// Fields that may carry the output hash used for drift detection
pub const HASH_FIELDS: &[&str] = &["data_hash", "output_hash"];

/// Numeric value of `field`, if present and a JSON number
pub fn numeric(kpis: &KpiMap, field: &str) -> Option<f64> {
    kpis.get(field).and_then(Value::as_f64)
}

/// Output hash of a record: the first non-empty `data_hash`/`output_hash`
pub fn output_hash(kpis: &KpiMap) -> Option<&str> {
    HASH_FIELDS
        .iter()
        .filter_map(|field| kpis.get(*field).and_then(Value::as_str))
        .find(|hash| !hash.is_empty())
}

/// Whether two records carry differing, non-empty output hashes
pub fn hashes_differ(baseline: &KpiMap, candidate: &KpiMap) -> bool {
    match (output_hash(baseline), output_hash(candidate)) {
        (Some(b), Some(c)) => b != c,
        _ => false,
    }
}
