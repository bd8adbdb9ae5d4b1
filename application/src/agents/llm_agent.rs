//! Agent backed by a language model

use super::{Agent, AgentError};
use crate::ports::judgment_backend::JudgmentBackend;
use async_trait::async_trait;
use council_domain::{
    AgentProfile, AgentPromptTemplate, CaseContext, Question, Vote, parse_agent_reply,
};
use std::sync::Arc;
use tracing::debug;

/// Prompts a [`JudgmentBackend`] with the role's persona and parses the reply
pub struct LlmAgent {
    profile: AgentProfile,
    system_prompt: String,
    backend: Arc<dyn JudgmentBackend>,
}

impl LlmAgent {
    pub fn new(profile: AgentProfile, backend: Arc<dyn JudgmentBackend>) -> Self {
        let system_prompt = AgentPromptTemplate::system_prompt(&profile.name, profile.role);
        Self {
            profile,
            system_prompt,
            backend,
        }
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    async fn judge(&self, case: &CaseContext, question: &Question) -> Result<Vote, AgentError> {
        let user_prompt = AgentPromptTemplate::user_prompt(self.profile.role, case, question);
        let response = self
            .backend
            .complete(&self.system_prompt, &user_prompt)
            .await?;
        debug!(
            agent = %self.profile.name,
            backend = self.backend.name(),
            bytes = response.len(),
            "Received agent reply"
        );

        let reply = parse_agent_reply(&response)
            .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;

        let Some(decision) = reply.decision else {
            return Err(AgentError::Abstained(format!(
                "voted {:?}: {}",
                reply.raw_vote, reply.reasoning
            )));
        };

        Ok(
            Vote::new(&self.profile, decision, reply.confidence, reply.reasoning)
                .with_citations(reply.citations)
                .with_recommendations(reply.recommendations),
        )
    }
}
