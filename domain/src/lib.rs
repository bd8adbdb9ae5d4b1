//! Domain layer for case-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A fixed roster of specialized agents judges one yes/no question about a
//! case. Their votes are reduced to a single decision:
//!
//! - **Quorum**: enough agents must respond for a decision to stand
//! - **Consensus**: majority decision, confidence from the majority side,
//!   disagreement when the panel splits or confidence spreads widely
//!
//! ## Bias check
//!
//! A stateless term-table heuristic over free text, independent of voting.

pub mod agent;
pub mod bias;
pub mod case;
pub mod core;
pub mod council;
pub mod prompt;

// Re-export commonly used types
pub use agent::{AgentProfile, AgentRole, Roster};
pub use bias::{BiasChecker, BiasFlag, BiasReport, OverallTone, Severity};
pub use case::CaseContext;
pub use core::{error::DomainError, question::Question};
pub use council::{
    Abstention, AgentReply, AgentVerdict, AnalysisKey, AnalysisRequest, AnalysisResult,
    ConsensusAggregator, ConsensusError, ConsensusPolicy, Decision, QuorumRule,
    RecommendationKind, ReplyParseError, Tally, Vote, parse_agent_reply,
};
pub use prompt::AgentPromptTemplate;
