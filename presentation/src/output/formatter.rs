//! Output formatter trait

use council_domain::{AnalysisResult, BiasReport};

/// Trait for formatting council output
pub trait OutputFormatter {
    /// Format the complete analysis with the per-agent breakdown
    fn format(&self, result: &AnalysisResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &AnalysisResult) -> String;

    /// Format a bias check report
    fn format_bias(&self, report: &BiasReport) -> String;
}
