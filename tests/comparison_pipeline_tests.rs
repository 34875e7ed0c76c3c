//! Integration tests for full snapshot comparisons
//!
//! Snapshots under tests/fixtures model a refactor of a small dbt project:
//! fct_orders got slower and pricier and changed its output, fct_revenue got
//! pricier only, dim_customers got faster, and a staging model was renamed.

use modeldiff::bottleneck::RegressionFlag;
use modeldiff::config::{AnalysisConfig, ConfigOverrides, Severity};
use modeldiff::delta::ModelDeltaSet;
use modeldiff::recommendation::Priority;
use modeldiff::snapshot::ModelKpis;
use modeldiff::{ComparisonAnalysis, ComparisonEngine};
use std::io::Write;
use std::path::PathBuf;

fn fixture(name: &str) -> ModelKpis {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let content = std::fs::read_to_string(&path).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn run(config: AnalysisConfig) -> ComparisonAnalysis {
    let baseline = fixture("baseline_kpis.json");
    let candidate = fixture("candidate_kpis.json");
    ComparisonEngine::new(config).run_from_snapshots(&baseline, &candidate, 10)
}

#[test]
fn test_model_lifecycle() {
    let analysis = run(AnalysisConfig::bundled().unwrap());

    assert_eq!(analysis.model_deltas.len(), 5);
    assert_eq!(analysis.model_deltas["stg_payments"], ModelDeltaSet::NewModel);
    assert_eq!(
        analysis.model_deltas["stg_payments_legacy"],
        ModelDeltaSet::RemovedModel
    );
    assert!(!analysis
        .bottlenecks
        .all_bottlenecks
        .contains_key("stg_payments"));
}

#[test]
fn test_delta_summary() {
    let analysis = run(AnalysisConfig::bundled().unwrap());

    // dim_customers: execution time, credits and cost all down 20%
    assert_eq!(analysis.delta_summary.improvements, 3);
    assert_eq!(analysis.delta_summary.improvement_best, Some(-20.0));
    // dim_customers.window_function_count has a zero baseline
    assert_eq!(analysis.delta_summary.errors, 1);
    assert_eq!(analysis.delta_summary.regression_worst, Some(30.0));

    let dim = analysis.model_deltas["dim_customers"].metrics().unwrap();
    assert_eq!(dim["window_function_count"].status(), "N/A - baseline zero");
    assert!(!dim.contains_key("data_hash"));
    assert!(!dim.contains_key("timestamp"));
}

#[test]
fn test_bottlenecks() {
    let analysis = run(AnalysisConfig::bundled().unwrap());
    let report = &analysis.bottlenecks;

    assert_eq!(report.total_models_analyzed, 3);
    assert_eq!(report.models_with_bottlenecks, 2);
    assert_eq!(report.critical_bottlenecks, vec!["fct_orders".to_string()]);

    let orders = &report.all_bottlenecks["fct_orders"];
    assert_eq!(orders.impact_score, 44.0);
    assert!(orders.regression_flags.contains(&RegressionFlag::DataDrift));
    assert_eq!(orders.regression_amounts["execution_time"], 30.0);

    let revenue = &report.all_bottlenecks["fct_revenue"];
    assert_eq!(revenue.severity, Severity::Medium);
    assert_eq!(revenue.impact_score, 12.0);

    let customers = &report.all_bottlenecks["dim_customers"];
    assert_eq!(customers.severity, Severity::Low);
    assert_eq!(customers.impact_score, 0.0);

    let ranked: Vec<&str> = report.summary.iter().map(|b| b.model_name.as_str()).collect();
    assert_eq!(ranked, vec!["fct_orders", "fct_revenue", "dim_customers"]);
}

#[test]
fn test_recommendations() {
    let analysis = run(AnalysisConfig::bundled().unwrap());

    let models: Vec<&str> = analysis.recommendations.keys().map(String::as_str).collect();
    assert_eq!(models, vec!["fct_orders"]);

    let scored: Vec<(&str, f64, Priority)> = analysis.recommendations["fct_orders"]
        .iter()
        .map(|r| (r.rule_id.as_str(), r.priority_score, r.priority))
        .collect();
    assert_eq!(
        scored,
        vec![
            ("HIGH_WINDOW_FUNCTION_COUNT", 91.0, Priority::High),
            ("HIGH_CTE_COUNT", 83.67, Priority::High),
            ("HIGH_JOIN_COUNT", 77.8, Priority::High),
        ]
    );
}

#[test]
fn test_overrides_raise_rule_thresholds() {
    let overrides = ConfigOverrides::from_vars([
        ("BENCHMARK_JOIN_THRESHOLD", "10"),
        ("BENCHMARK_CTE_THRESHOLD", "10"),
        ("BENCHMARK_TIME_REGRESSION_THRESHOLD", "50"),
        ("PATH", "/usr/bin"),
    ]);
    let config = AnalysisConfig::bundled().unwrap().with_overrides(&overrides);

    let analysis = run(config);

    let rules: Vec<&str> = analysis.recommendations["fct_orders"]
        .iter()
        .map(|r| r.rule_id.as_str())
        .collect();
    assert_eq!(rules, vec!["HIGH_WINDOW_FUNCTION_COUNT"]);

    // 30% no longer crosses the execution time threshold: cost-only MEDIUM
    let orders = &analysis.bottlenecks.all_bottlenecks["fct_orders"];
    assert_eq!(orders.severity, Severity::Medium);
    assert!(analysis.bottlenecks.critical_bottlenecks.is_empty());
}

#[test]
fn test_custom_rule_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[bottleneck_thresholds.cost]
regression_threshold_percent = 40

[[optimization_rules]]
rule_id = "MANY_WINDOWS"
name = "Many window functions"
metric = "window_function_count"
threshold = 0
severity = "LOW"
optimization_technique = "Pre-aggregate before windowing"
sql_pattern_suggestion = ["Move ROW_NUMBER() into an upstream model"]
rationale = "Window functions force a sort per partition."
"#
    )
    .unwrap();

    let config = AnalysisConfig::from_toml_file(file.path()).unwrap();
    let analysis = run(config);

    // Without KPI definitions every numeric field is inferred
    let orders = analysis.model_deltas["fct_orders"].metrics().unwrap();
    assert!(orders.contains_key("credits_consumed"));

    // fct_revenue's 25% cost increase is under the raised threshold
    assert_eq!(
        analysis.bottlenecks.all_bottlenecks["fct_revenue"].severity,
        Severity::Low
    );

    let models: Vec<&str> = analysis.recommendations.keys().map(String::as_str).collect();
    assert_eq!(models, vec!["fct_orders", "fct_revenue"]);
    assert_eq!(analysis.recommendations["fct_orders"][0].rule_id, "MANY_WINDOWS");
}

#[test]
fn test_analysis_json_written_and_reloaded() {
    let analysis = run(AnalysisConfig::bundled().unwrap());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.json");
    std::fs::write(&path, analysis.to_json_pretty().unwrap()).unwrap();

    let reloaded = ComparisonAnalysis::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reloaded, analysis);
}

#[test]
fn test_console_report() {
    let report = run(AnalysisConfig::bundled().unwrap()).to_report_string();

    assert!(report.contains("Models compared: 5 (new: 1, removed: 1)"));
    assert!(report.contains("🔥 BOTTLENECKS (2 of 3 models)"));
    assert!(report.contains("fct_revenue [MEDIUM] impact 12.00 (COST_REGRESSION)"));
    assert!(report.contains("💡 RECOMMENDATIONS (3: 3 HIGH, 0 MEDIUM, 0 LOW)"));
}
