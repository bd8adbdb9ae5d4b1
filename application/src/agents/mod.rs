//! The agent contract
//!
//! An agent turns a case and a question into a vote. The orchestrator treats
//! every agent identically; how a judgment is reached (model call, rules,
//! canned answers in tests) is the implementation's business.

pub mod llm_agent;

use crate::ports::judgment_backend::{BackendError, JudgmentBackend};
use async_trait::async_trait;
use council_domain::{AgentProfile, CaseContext, Question, Roster, Vote};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use llm_agent::LlmAgent;

/// Why an agent produced no vote
///
/// Never fails a request on its own: the orchestrator records it as an
/// abstention and lets the quorum rule decide.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("abstained: {0}")]
    Abstained(String),
}

impl AgentError {
    /// Whether another attempt could plausibly succeed
    ///
    /// Timeouts are final because the deadline covers every attempt, and an
    /// explicit abstention is the agent's answer.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::Backend(_) | AgentError::MalformedResponse(_)
        )
    }
}

/// A council member
#[async_trait]
pub trait Agent: Send + Sync {
    fn profile(&self) -> &AgentProfile;

    /// Judge `question` for `case`
    async fn judge(&self, case: &CaseContext, question: &Question) -> Result<Vote, AgentError>;
}

/// Build one backend-driven agent per roster entry, in roster order
pub fn build_agents(roster: &Roster, backend: Arc<dyn JudgmentBackend>) -> Vec<Arc<dyn Agent>> {
    roster
        .profiles()
        .iter()
        .map(|profile| {
            Arc::new(LlmAgent::new(profile.clone(), Arc::clone(&backend))) as Arc<dyn Agent>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(AgentError::Backend(BackendError::Timeout).is_retryable());
        assert!(AgentError::MalformedResponse("no json".into()).is_retryable());
        assert!(!AgentError::Timeout(Duration::from_secs(120)).is_retryable());
        assert!(!AgentError::Abstained("conflict of interest".into()).is_retryable());
    }

    #[test]
    fn test_timeout_message() {
        let error = AgentError::Timeout(Duration::from_secs(120));
        assert_eq!(error.to_string(), "timed out after 120s");
    }
}
