//! modeldiff - Baseline vs candidate analytics for data pipeline models
//!
//! This library compares two performance snapshots of the same set of
//! pipeline models (execution time, cost, work and complexity KPIs per
//! model), computes per-KPI percentage deltas, flags bottleneck models with
//! an impact score and severity, and turns structural complexity into
//! prioritized, rule-based optimization recommendations.
//!
//! The engine is synchronous and pure: it never reads files, environment
//! variables or the clock on its own. Configuration is loaded by the caller
//! (see [`config::AnalysisConfig`]) and injected into
//! [`analysis::ComparisonEngine`].

pub mod analysis;
pub mod bottleneck;
pub mod complexity;
pub mod config;
pub mod delta;
pub mod error;
pub mod pricing;
pub mod recommendation;
pub mod snapshot;

pub use analysis::{ComparisonAnalysis, ComparisonEngine};
pub use config::AnalysisConfig;
pub use error::ConfigError;
