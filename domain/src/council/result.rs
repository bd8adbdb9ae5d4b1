//! The consensus artifact returned for every successful analysis

use super::vote::{Abstention, AgentVerdict, Decision, Vote};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Consensus reached by the council for one (case, question) pair
///
/// Immutable once produced; cached and shared behind `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub question: String,
    pub decision: Decision,
    /// Mean confidence of the agents that voted with the decision
    pub confidence: f64,
    pub yes_votes: usize,
    pub no_votes: usize,
    /// `yes_votes / (yes_votes + no_votes)`, in `[0, 1]`
    pub yes_percentage: f64,
    pub has_disagreement: bool,
    /// Every roster agent, in roster order, including abstentions
    pub agent_breakdown: Vec<AgentVerdict>,
    pub recommendation: String,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Votes of agents that responded
    pub fn votes(&self) -> impl Iterator<Item = &Vote> {
        self.agent_breakdown.iter().filter_map(AgentVerdict::vote)
    }

    /// Agents that abstained
    pub fn abstentions(&self) -> impl Iterator<Item = &Abstention> {
        self.agent_breakdown.iter().filter_map(|v| match v {
            AgentVerdict::Abstained(a) => Some(a),
            AgentVerdict::Responded(_) => None,
        })
    }

    pub fn responded(&self) -> usize {
        self.yes_votes + self.no_votes
    }

    pub fn is_unanimous(&self) -> bool {
        self.yes_votes == 0 || self.no_votes == 0
    }

    /// Visual vote summary in roster order, e.g. "[●●○-●]"
    ///
    /// ● = YES, ○ = NO, - = abstained
    pub fn vote_summary(&self) -> String {
        let mut summary = String::from("[");
        for verdict in &self.agent_breakdown {
            summary.push(match verdict.vote() {
                Some(vote) if vote.decision.is_yes() => '●',
                Some(_) => '○',
                None => '-',
            });
        }
        summary.push(']');
        summary
    }
}
