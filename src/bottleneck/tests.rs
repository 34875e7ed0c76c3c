// Bottleneck detection tests against realistic comparison runs
//
// Scenarios mirror what shows up when a dbt project is rerun after a change:
// a model that got slower and changed its output, one that got pricier,
// one that only moved within noise, and models that came and went.

use super::*;
use crate::config::{AnalysisConfig, BottleneckThresholds, RegressionThreshold, Severity};
use crate::delta::{
    calculate_model_deltas, DeltaOutcome, DeltaResult, Direction, MetricDeltas, ModelDeltas,
};
use crate::snapshot::ModelKpis;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

fn models(value: serde_json::Value) -> ModelKpis {
    serde_json::from_value(value).unwrap()
}

fn comparison_run() -> ModelDeltas {
    let baseline = models(json!({
        "fct_orders": {"execution_time": 10.0, "cost": 10.0, "output_hash": "a1b2c3d4e5"},
        "stg_customers": {"execution_time": 10.0, "cost": 10.0},
        "dim_products": {"execution_time": 10.0, "cost": 10.0},
        "int_events": {"execution_time": 10.0, "estimated_cost_usd": 1.0},
        "stg_legacy": {"execution_time": 3.0}
    }));
    let candidate = models(json!({
        "fct_orders": {"execution_time": 12.0, "cost": 13.0, "output_hash": "ffff0000aa"},
        "stg_customers": {"execution_time": 10.5, "cost": 10.0},
        "dim_products": {"execution_time": 10.8, "cost": 12.5},
        "int_events": {"execution_time": 10.0, "estimated_cost_usd": 1.5},
        "stg_new": {"execution_time": 1.0}
    }));
    calculate_model_deltas(&baseline, &candidate, &AnalysisConfig::default())
}

fn result(name: &str, impact_score: f64, severity: Severity) -> BottleneckResult {
    BottleneckResult {
        model_name: name.to_string(),
        impact_score,
        severity,
        regression_flags: BTreeSet::new(),
        regression_amounts: BTreeMap::new(),
        data_drift_detected: false,
        kpi_categorizations: BTreeMap::new(),
    }
}

fn success(delta: f64, direction: Direction) -> DeltaResult {
    DeltaResult::new(DeltaOutcome::Success { delta, direction }, false)
}

/// Slower, pricier and producing different output
///
/// Expected: all three flags, CRITICAL, impact 40
#[test]
fn test_slow_expensive_drifted_model_is_critical() {
    let bottlenecks = detect_bottlenecks(&comparison_run(), &AnalysisConfig::default());
    let orders = &bottlenecks["fct_orders"];

    assert_eq!(orders.severity, Severity::Critical);
    assert!(orders.data_drift_detected);
    assert_eq!(
        orders.regression_flags,
        BTreeSet::from([
            RegressionFlag::ExecutionTimeRegression,
            RegressionFlag::CostRegression,
            RegressionFlag::DataDrift,
        ])
    );
    assert_eq!(orders.regression_amounts["execution_time"], 20.0);
    assert_eq!(orders.regression_amounts["cost"], 30.0);
    assert_eq!(orders.cost_regression(), Some(30.0));
    assert_eq!(orders.impact_score, 40.0);
}

/// Cost-only regression
///
/// Expected: MEDIUM, execution time below threshold still adds impact
#[test]
fn test_cost_only_regression_is_medium() {
    let bottlenecks = detect_bottlenecks(&comparison_run(), &AnalysisConfig::default());
    let products = &bottlenecks["dim_products"];

    assert_eq!(products.severity, Severity::Medium);
    assert_eq!(
        products.regression_flags,
        BTreeSet::from([RegressionFlag::CostRegression])
    );
    assert!(!products.regression_amounts.contains_key("execution_time"));
    assert_eq!(products.impact_score, 13.2);
}

#[test]
fn test_cost_falls_back_to_estimated_cost_usd() {
    let bottlenecks = detect_bottlenecks(&comparison_run(), &AnalysisConfig::default());
    let events = &bottlenecks["int_events"];

    assert_eq!(events.severity, Severity::Medium);
    assert_eq!(events.regression_amounts["cost"], 50.0);
    assert_eq!(events.impact_score, 20.0);
}

/// Small movement only: no flags, LOW, but still reported
#[test]
fn test_within_threshold_model_is_low() {
    let bottlenecks = detect_bottlenecks(&comparison_run(), &AnalysisConfig::default());
    let customers = &bottlenecks["stg_customers"];

    assert_eq!(customers.severity, Severity::Low);
    assert!(!customers.is_bottleneck());
    assert_eq!(customers.impact_score, 2.0);
    assert_eq!(
        customers.kpi_categorizations["execution_time"].category,
        KpiCategory::Regressed
    );
    assert_eq!(
        customers.kpi_categorizations["cost"].category,
        KpiCategory::Neutral
    );
}

#[test]
fn test_new_and_removed_models_are_skipped() {
    let bottlenecks = detect_bottlenecks(&comparison_run(), &AnalysisConfig::default());

    assert!(!bottlenecks.contains_key("stg_new"));
    assert!(!bottlenecks.contains_key("stg_legacy"));
    assert_eq!(bottlenecks.len(), 4);
}

#[test]
fn test_configured_thresholds_are_respected() {
    let config = AnalysisConfig {
        bottleneck_thresholds: BottleneckThresholds {
            execution_time: RegressionThreshold::new(25.0),
            cost: RegressionThreshold::new(40.0),
        },
        ..AnalysisConfig::default()
    };
    let bottlenecks = detect_bottlenecks(&comparison_run(), &config);

    // 20% exec and 30% cost no longer cross; drift alone stays LOW
    let orders = &bottlenecks["fct_orders"];
    assert_eq!(
        orders.regression_flags,
        BTreeSet::from([RegressionFlag::DataDrift])
    );
    assert_eq!(orders.severity, Severity::Low);

    assert_eq!(bottlenecks["int_events"].severity, Severity::Medium);
    assert_eq!(bottlenecks["dim_products"].severity, Severity::Low);
}

#[test]
fn test_threshold_boundary_is_not_a_regression() {
    assert!(!check_execution_time_regression(Some(10.0), 10.0));
    assert!(check_execution_time_regression(Some(10.01), 10.0));
    assert!(!check_execution_time_regression(None, 10.0));

    assert!(!check_cost_regression(Some(20.0), 20.0));
    assert!(check_cost_regression(Some(20.5), 20.0));
    assert!(!check_cost_regression(Some(-50.0), 20.0));
}

#[test]
fn test_check_data_drift() {
    assert!(!check_data_drift(None));
    assert!(!check_data_drift(Some(&success(3.0, Direction::Regression))));
    assert!(!check_data_drift(Some(&DeltaResult::new(
        DeltaOutcome::BaselineZero,
        false
    ))));
    assert!(check_data_drift(Some(&DeltaResult::new(
        DeltaOutcome::NullValue,
        true
    ))));
}

#[test]
fn test_categorize_kpi_noise_floor() {
    let tiny = success(-0.49, Direction::Improvement);
    let c = categorize_kpi("execution_time", Some(&tiny));
    assert_eq!(c.category, KpiCategory::Neutral);
    assert_eq!(c.delta, Some(-0.49));

    let edge = success(0.5, Direction::Regression);
    assert_eq!(
        categorize_kpi("cost", Some(&edge)).category,
        KpiCategory::Regressed
    );

    let improved = success(-12.0, Direction::Improvement);
    assert_eq!(
        categorize_kpi("cost", Some(&improved)).category,
        KpiCategory::Improved
    );
}

#[test]
fn test_categorize_kpi_without_delta() {
    let none = categorize_kpi("cost", None);
    assert_eq!(none.category, KpiCategory::Neutral);
    assert_eq!(none.delta, None);

    let zero = DeltaResult::new(DeltaOutcome::BaselineZero, false);
    let c = categorize_kpi("cost", Some(&zero));
    assert_eq!(c.category, KpiCategory::Neutral);
    assert_eq!(c.delta, None);
}

#[test]
fn test_categorize_model_kpis_skips_private_keys() {
    let mut deltas = MetricDeltas::new();
    deltas.insert("_status".to_string(), success(50.0, Direction::Regression));
    deltas.insert("cost".to_string(), success(50.0, Direction::Regression));
    deltas.insert("row_count".to_string(), success(5.0, Direction::Improvement));

    let categorized = categorize_model_kpis("fct_orders", &deltas);

    let keys: Vec<&str> = categorized.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["cost", "row_count"]);
    assert_eq!(categorized["row_count"].category, KpiCategory::Improved);
}

#[test]
fn test_rank_by_impact_descending() {
    let mut bottlenecks = Bottlenecks::new();
    bottlenecks.insert("a".to_string(), result("a", 12.5, Severity::Low));
    bottlenecks.insert("b".to_string(), result("b", 80.0, Severity::High));
    bottlenecks.insert("c".to_string(), result("c", 40.0, Severity::Medium));
    bottlenecks.insert("d".to_string(), result("d", 80.0, Severity::Critical));

    let ranked: Vec<&str> = rank_bottlenecks_by_impact(&bottlenecks)
        .iter()
        .map(|b| b.model_name.as_str())
        .collect();

    // Equal scores keep name order
    assert_eq!(ranked, vec!["b", "d", "c", "a"]);
}

#[test]
fn test_summary_truncates_to_top_n() {
    let bottlenecks = detect_bottlenecks(&comparison_run(), &AnalysisConfig::default());

    let top = generate_bottleneck_summary(&bottlenecks, 2);
    let names: Vec<&str> = top.iter().map(|b| b.model_name.as_str()).collect();
    assert_eq!(names, vec!["fct_orders", "int_events"]);

    assert_eq!(
        generate_bottleneck_summary(&bottlenecks, DEFAULT_TOP_N).len(),
        4
    );
    assert!(generate_bottleneck_summary(&bottlenecks, 0).is_empty());
}

#[test]
fn test_format_bottleneck_output() {
    let bottlenecks = detect_bottlenecks(&comparison_run(), &AnalysisConfig::default());
    let summary = generate_bottleneck_summary(&bottlenecks, 3);

    let report = format_bottleneck_output(&bottlenecks, summary);

    assert_eq!(report.total_models_analyzed, 4);
    assert_eq!(report.models_with_bottlenecks, 3);
    assert_eq!(report.critical_bottlenecks, vec!["fct_orders".to_string()]);
    assert_eq!(report.summary.len(), 3);
    assert_eq!(report.all_bottlenecks, bottlenecks);
}

#[test]
fn test_bottleneck_result_serialization() {
    let bottlenecks = detect_bottlenecks(&comparison_run(), &AnalysisConfig::default());
    let value = serde_json::to_value(&bottlenecks["fct_orders"]).unwrap();

    assert_eq!(value["severity"], json!("CRITICAL"));
    assert_eq!(
        value["regression_flags"],
        json!(["EXECUTION_TIME_REGRESSION", "COST_REGRESSION", "DATA_DRIFT"])
    );
    assert_eq!(
        value["kpi_categorizations"]["cost"],
        json!({"category": "regressed", "delta": 30.0})
    );

    let back: BottleneckResult = serde_json::from_value(value).unwrap();
    assert_eq!(back, bottlenecks["fct_orders"]);
}

#[test]
fn test_empty_input() {
    let bottlenecks = detect_bottlenecks(&ModelDeltas::new(), &AnalysisConfig::default());
    assert!(bottlenecks.is_empty());

    let report = format_bottleneck_output(&bottlenecks, Vec::new());
    assert_eq!(report.total_models_analyzed, 0);
    assert!(report.critical_bottlenecks.is_empty());
}
