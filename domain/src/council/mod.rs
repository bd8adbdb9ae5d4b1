//! Council deliberation domain
//!
//! Core concepts for reducing independent agent judgments into one auditable
//! decision.
//!
//! # Flow
//!
//! ```text
//! AnalysisRequest ──► agents (in parallel) ──► Vec<AgentVerdict>
//!                                                   │
//!                                   QuorumRule check│
//!                                                   ▼
//!                                        ConsensusAggregator
//!                                                   │
//!                                                   ▼
//!                                            AnalysisResult
//! ```
//!
//! Abstentions stay in the breakdown but never count toward the tally.

pub mod consensus;
pub mod parsing;
pub mod recommendation;
pub mod request;
pub mod result;
pub mod rule;
pub mod vote;

pub use consensus::{ConsensusAggregator, ConsensusError, ConsensusPolicy, Tally};
pub use parsing::{AgentReply, ReplyParseError, parse_agent_reply};
pub use recommendation::RecommendationKind;
pub use request::{AnalysisKey, AnalysisRequest};
pub use result::AnalysisResult;
pub use rule::QuorumRule;
pub use vote::{Abstention, AgentVerdict, Decision, Vote, clamp_confidence};
