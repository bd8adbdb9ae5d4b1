//! Council parameters for orchestration control.
//!
//! [`CouncilParams`] groups the static parameters that control one analysis
//! in [`RunAnalysisUseCase`](crate::use_cases::run_analysis::RunAnalysisUseCase).

use council_domain::{ConsensusPolicy, DomainError, Question, QuorumRule};
use std::time::Duration;

/// Question used when a request does not carry one
pub const DEFAULT_QUESTION: &str = "Does this incident meet Title IX hostile environment standard and fall within institutional jurisdiction?";

/// Orchestration parameters.
///
/// Controls per-agent deadlines, retries, the quorum rule and the
/// disagreement threshold handed to the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct CouncilParams {
    /// Deadline covering every attempt of one agent
    pub agent_timeout: Duration,
    /// Extra attempts after a failed (not timed out) agent call
    pub max_retries: u32,
    pub quorum: QuorumRule,
    pub consensus: ConsensusPolicy,
    pub default_question: String,
}

impl Default for CouncilParams {
    fn default() -> Self {
        Self {
            agent_timeout: Duration::from_secs(120),
            max_retries: 1,
            quorum: QuorumRule::Majority,
            consensus: ConsensusPolicy::default(),
            default_question: DEFAULT_QUESTION.to_string(),
        }
    }
}

impl CouncilParams {
    // ==================== Builder Methods ====================

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_quorum(mut self, quorum: QuorumRule) -> Self {
        self.quorum = quorum;
        self
    }

    pub fn with_disagreement_threshold(mut self, threshold: f64) -> Self {
        self.consensus = self.consensus.with_disagreement_threshold(threshold);
        self
    }

    pub fn with_default_question(mut self, question: impl Into<String>) -> Self {
        self.default_question = question.into();
        self
    }

    /// The configured default question as a validated [`Question`]
    pub fn default_question(&self) -> Result<Question, DomainError> {
        Question::new(self.default_question.as_str())
    }
}
