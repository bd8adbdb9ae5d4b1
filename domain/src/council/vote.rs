//! Vote types for council deliberation
//!
//! This module defines the voting primitives produced by individual agents
//! and the per-agent breakdown entries recorded in every analysis.

use crate::agent::{AgentProfile, AgentRole};
use serde::{Deserialize, Serialize};

/// A yes/no decision on the question put to the council
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Yes,
    No,
}

impl Decision {
    pub fn is_yes(&self) -> bool {
        matches!(self, Decision::Yes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Yes => "YES",
            Decision::No => "NO",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "YES" => Ok(Decision::Yes),
            "NO" => Ok(Decision::No),
            other => Err(format!("not a yes/no decision: {}", other)),
        }
    }
}

/// Clamp a reported confidence into `[0, 1]`; NaN counts as no confidence.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// A single agent's vote on one analysis request
///
/// # Example
///
/// ```
/// use council_domain::agent::{AgentProfile, AgentRole};
/// use council_domain::council::{Decision, Vote};
///
/// let lex = AgentProfile::new("Lex", AgentRole::LegalCompliance);
/// let vote = Vote::new(&lex, Decision::Yes, 1.4, "Meets the severe-or-pervasive bar.");
/// assert_eq!(vote.confidence, 1.0); // clamped
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub agent_name: String,
    pub agent_role: AgentRole,
    pub decision: Decision,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl Vote {
    /// Create a new vote; confidence is clamped to `[0, 1]`
    pub fn new(
        agent: &AgentProfile,
        decision: Decision,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: agent.name.clone(),
            agent_role: agent.role,
            decision,
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
            citations: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn yes(agent: &AgentProfile, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self::new(agent, Decision::Yes, confidence, reasoning)
    }

    pub fn no(agent: &AgentProfile, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self::new(agent, Decision::No, confidence, reasoning)
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }

    pub fn with_recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = recommendations;
        self
    }
}

/// An agent that could not weigh in, recorded for auditability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Abstention {
    pub agent_name: String,
    pub agent_role: AgentRole,
    /// Why the agent produced no vote (timeout, backend failure, ...)
    pub abstain_reason: String,
}

impl Abstention {
    pub fn new(agent: &AgentProfile, reason: impl Into<String>) -> Self {
        Self {
            agent_name: agent.name.clone(),
            agent_role: agent.role,
            abstain_reason: reason.into(),
        }
    }
}

/// One entry of an analysis breakdown: either a vote or an abstention
///
/// Serialized with a `status` tag so abstentions remain visible to
/// consumers that only know the vote shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AgentVerdict {
    Responded(Vote),
    Abstained(Abstention),
}

impl AgentVerdict {
    pub fn agent_name(&self) -> &str {
        match self {
            AgentVerdict::Responded(vote) => &vote.agent_name,
            AgentVerdict::Abstained(abstention) => &abstention.agent_name,
        }
    }

    pub fn agent_role(&self) -> AgentRole {
        match self {
            AgentVerdict::Responded(vote) => vote.agent_role,
            AgentVerdict::Abstained(abstention) => abstention.agent_role,
        }
    }

    pub fn vote(&self) -> Option<&Vote> {
        match self {
            AgentVerdict::Responded(vote) => Some(vote),
            AgentVerdict::Abstained(_) => None,
        }
    }

    pub fn is_abstained(&self) -> bool {
        matches!(self, AgentVerdict::Abstained(_))
    }
}

impl From<Vote> for AgentVerdict {
    fn from(vote: Vote) -> Self {
        AgentVerdict::Responded(vote)
    }
}

impl From<Abstention> for AgentVerdict {
    fn from(abstention: Abstention) -> Self {
        AgentVerdict::Abstained(abstention)
    }
}
