//! Progress notification port
//!
//! Defines the interface for reporting progress while the council deliberates.

use council_domain::{AgentVerdict, AnalysisResult};

/// Callback for progress updates during an analysis
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinner, JSON stream, etc.)
pub trait CouncilProgress: Send + Sync {
    /// Called once the case is loaded and agents are dispatched
    fn on_analysis_start(&self, case_id: &str, roster_size: usize);

    /// Called as each agent finishes, in completion order
    fn on_agent_complete(&self, verdict: &AgentVerdict);

    /// Called when the consensus is ready
    fn on_analysis_complete(&self, _result: &AnalysisResult) {}

    /// Called when the analysis fails after dispatch
    fn on_analysis_failed(&self, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CouncilProgress for NoProgress {
    fn on_analysis_start(&self, _case_id: &str, _roster_size: usize) {}
    fn on_agent_complete(&self, _verdict: &AgentVerdict) {}
}
