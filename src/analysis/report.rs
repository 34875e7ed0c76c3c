// Human-readable rendering of a comparison analysis

use crate::analysis::engine::ComparisonAnalysis;
use crate::delta::ModelDeltaSet;

impl ComparisonAnalysis {
    /// Format the analysis as a console report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        let new_models = self
            .model_deltas
            .values()
            .filter(|s| matches!(s, ModelDeltaSet::NewModel))
            .count();
        let removed_models = self
            .model_deltas
            .values()
            .filter(|s| matches!(s, ModelDeltaSet::RemovedModel))
            .count();

        report.push_str("📊 MODEL COMPARISON ANALYSIS\n\n");
        report.push_str(&format!(
            "Models compared: {} (new: {}, removed: {})\n",
            self.delta_summary.total_models, new_models, removed_models
        ));
        report.push_str(&format!(
            "Metrics: {} improved, {} regressed, {} without delta\n",
            self.delta_summary.improvements,
            self.delta_summary.regressions,
            self.delta_summary.errors
        ));
        if let Some(worst) = self.delta_summary.regression_worst {
            report.push_str(&format!("Worst regression: {:+.2}%\n", worst));
        }

        // Bottlenecks
        let bottlenecks = &self.bottlenecks;
        let flagged: Vec<_> = bottlenecks.summary.iter().filter(|b| b.is_bottleneck()).collect();
        if flagged.is_empty() {
            report.push_str("\n✅ NO BOTTLENECKS DETECTED\n");
        } else {
            report.push_str(&format!(
                "\n🔥 BOTTLENECKS ({} of {} models)\n",
                bottlenecks.models_with_bottlenecks, bottlenecks.total_models_analyzed
            ));
            for (i, b) in flagged.iter().enumerate() {
                let flags: Vec<&str> = b.regression_flags.iter().map(|f| f.as_str()).collect();
                report.push_str(&format!(
                    "  {}. {} [{}] impact {:.2} ({})\n",
                    i + 1,
                    b.model_name,
                    b.severity,
                    b.impact_score,
                    flags.join(", ")
                ));
                for (metric, amount) in &b.regression_amounts {
                    report.push_str(&format!("     {}: +{:.2}%\n", metric, amount));
                }
            }
        }

        if !bottlenecks.critical_bottlenecks.is_empty() {
            report.push_str(&format!(
                "\n❌ CRITICAL: {}\n",
                bottlenecks.critical_bottlenecks.join(", ")
            ));
        }

        let drifted: Vec<&str> = bottlenecks
            .all_bottlenecks
            .values()
            .filter(|b| b.data_drift_detected)
            .map(|b| b.model_name.as_str())
            .collect();
        if !drifted.is_empty() {
            report.push_str(&format!(
                "\n⚠️  DATA DRIFT ({} models): {}\n",
                drifted.len(),
                drifted.join(", ")
            ));
        }

        // Recommendations
        let summary = &self.recommendation_summary;
        if summary.total_recommendations > 0 {
            report.push_str(&format!(
                "\n💡 RECOMMENDATIONS ({}: {} HIGH, {} MEDIUM, {} LOW)\n",
                summary.total_recommendations,
                summary.high_priority_count,
                summary.medium_priority_count,
                summary.low_priority_count
            ));
            for rec in &summary.top_recommendations {
                report.push_str(&format!(
                    "  [{} {:.2}] {}: {}\n",
                    rec.priority, rec.priority_score, rec.model_name, rec.optimization_technique
                ));
                report.push_str(&format!(
                    "     {} = {} (threshold {})\n",
                    rec.complexity_metric, rec.complexity_value, rec.threshold_value
                ));
                if let Some(first) = rec.sql_pattern_suggestion.first() {
                    report.push_str(&format!("     → {}\n", first));
                }
            }
        }

        report
    }
}
