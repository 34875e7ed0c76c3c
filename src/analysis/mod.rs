//! End-to-end snapshot comparison
//!
//! [`ComparisonEngine`] chains delta aggregation, bottleneck detection and
//! recommendation generation into one pass and returns a serializable
//! [`ComparisonAnalysis`] for the reporting layer.

mod engine;
mod report;

pub use engine::{ComparisonAnalysis, ComparisonEngine};
