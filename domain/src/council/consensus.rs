//! Consensus aggregation
//!
//! Reduces a breakdown of agent verdicts into one [`AnalysisResult`]. This is
//! a pure, synchronous reduction: no I/O and no suspension points.
//!
//! # Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | `yes_votes` / `no_votes` | Counts over responding agents only |
//! | `decision` | Majority; a tie resolves to `NO` |
//! | `confidence` | Mean confidence of agents that voted with `decision` |
//! | `has_disagreement` | Split vote, tie, or confidence spread above threshold |
//! | `recommendation` | One of four fixed templates |

use super::recommendation::RecommendationKind;
use super::result::AnalysisResult;
use super::vote::{AgentVerdict, Decision, Vote};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance used when comparing a confidence spread against the threshold,
/// so that e.g. `0.9 - 0.6` does not count as exceeding `0.3`.
const SPREAD_EPSILON: f64 = 1e-9;

/// Errors from consensus aggregation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("No agent returned a decision; consensus is undefined")]
    NoResponders,
}

/// Tunables for the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusPolicy {
    /// Maximum tolerated spread between the highest and lowest responder
    /// confidence before the outcome is flagged as disputed
    pub disagreement_threshold: f64,
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            disagreement_threshold: 0.30,
        }
    }
}

impl ConsensusPolicy {
    pub fn with_disagreement_threshold(mut self, threshold: f64) -> Self {
        self.disagreement_threshold = threshold;
        self
    }
}

/// Vote counts over responding agents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub yes: usize,
    pub no: usize,
}

impl Tally {
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> Self {
        votes.into_iter().fold(Tally { yes: 0, no: 0 }, |mut t, v| {
            match v.decision {
                Decision::Yes => t.yes += 1,
                Decision::No => t.no += 1,
            }
            t
        })
    }

    pub fn total(&self) -> usize {
        self.yes + self.no
    }

    pub fn is_tie(&self) -> bool {
        self.yes == self.no
    }

    pub fn is_split(&self) -> bool {
        self.yes > 0 && self.no > 0
    }

    /// Majority decision; ties go to `NO`
    pub fn decision(&self) -> Decision {
        if self.yes > self.no {
            Decision::Yes
        } else {
            Decision::No
        }
    }

    /// Share of YES among responders, `None` when nobody responded
    pub fn yes_ratio(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.yes as f64 / total as f64),
        }
    }
}

/// Reduces agent verdicts into a consensus
///
/// # Example
///
/// ```
/// use council_domain::agent::Roster;
/// use council_domain::council::{ConsensusAggregator, Decision, Vote};
///
/// let roster = Roster::default();
/// let verdicts = roster
///     .profiles()
///     .iter()
///     .map(|p| Vote::yes(p, 0.9, "meets the standard").into())
///     .collect();
///
/// let result = ConsensusAggregator::default()
///     .aggregate("Within jurisdiction?", verdicts)
///     .unwrap();
/// assert_eq!(result.decision, Decision::Yes);
/// assert!(!result.has_disagreement);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusAggregator {
    policy: ConsensusPolicy,
}

impl ConsensusAggregator {
    pub fn new(policy: ConsensusPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ConsensusPolicy {
        &self.policy
    }

    /// Aggregate, stamping the result with the current UTC instant
    pub fn aggregate(
        &self,
        question: impl Into<String>,
        breakdown: Vec<AgentVerdict>,
    ) -> Result<AnalysisResult, ConsensusError> {
        self.aggregate_at(question, breakdown, Utc::now())
    }

    /// Aggregate with an explicit timestamp
    pub fn aggregate_at(
        &self,
        question: impl Into<String>,
        breakdown: Vec<AgentVerdict>,
        analyzed_at: DateTime<Utc>,
    ) -> Result<AnalysisResult, ConsensusError> {
        let votes: Vec<&Vote> = breakdown.iter().filter_map(AgentVerdict::vote).collect();
        let tally = Tally::from_votes(votes.iter().copied());
        let yes_percentage = tally.yes_ratio().ok_or(ConsensusError::NoResponders)?;

        let decision = tally.decision();
        let confidence = mean(
            votes
                .iter()
                .filter(|v| v.decision == decision)
                .map(|v| v.confidence),
        );

        let has_disagreement = tally.is_tie()
            || tally.is_split()
            || confidence_spread(&votes) > self.policy.disagreement_threshold + SPREAD_EPSILON;

        let recommendation = RecommendationKind::from_outcome(decision, has_disagreement)
            .render(tally.yes, tally.no, confidence);

        Ok(AnalysisResult {
            question: question.into(),
            decision,
            confidence,
            yes_votes: tally.yes,
            no_votes: tally.no,
            yes_percentage,
            has_disagreement,
            agent_breakdown: breakdown,
            recommendation,
            analyzed_at,
        })
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn confidence_spread(votes: &[&Vote]) -> f64 {
    let max = votes.iter().map(|v| v.confidence).fold(f64::MIN, f64::max);
    let min = votes.iter().map(|v| v.confidence).fold(f64::MAX, f64::min);
    if votes.is_empty() { 0.0 } else { max - min }
}
