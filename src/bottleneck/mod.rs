// Bottleneck detection
//
// Flags models whose execution time or cost regressed past the configured
// thresholds, scores each model's regression impact (0-100) and assigns a
// severity tier. New and removed models are never bottlenecks.

mod detector;
mod report;
mod scoring;

pub use detector::{
    categorize_kpi, categorize_model_kpis, check_cost_regression, check_data_drift,
    check_execution_time_regression, detect_bottlenecks, BottleneckResult, Bottlenecks,
    KpiCategorization, KpiCategory, RegressionFlag, NOISE_FLOOR_PERCENT,
};
pub use report::{
    format_bottleneck_output, generate_bottleneck_summary, rank_bottlenecks_by_impact,
    BottleneckReport, DEFAULT_TOP_N,
};
pub use scoring::{calculate_impact_score, classify_severity};

#[cfg(test)]
mod tests;
