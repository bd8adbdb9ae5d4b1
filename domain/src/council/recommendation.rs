//! Deterministic recommendation text
//!
//! The aggregator never generates free-form text. It picks one of four fixed
//! templates from the decision and the disagreement flag, then fills in the
//! tally and confidence.

use super::vote::Decision;
use serde::{Deserialize, Serialize};

/// Which recommendation template applies to an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ConfidentYes,
    ConfidentNo,
    DisputedLeanYes,
    DisputedLeanNo,
}

impl RecommendationKind {
    pub fn from_outcome(decision: Decision, has_disagreement: bool) -> Self {
        match (decision, has_disagreement) {
            (Decision::Yes, false) => RecommendationKind::ConfidentYes,
            (Decision::No, false) => RecommendationKind::ConfidentNo,
            (Decision::Yes, true) => RecommendationKind::DisputedLeanYes,
            (Decision::No, true) => RecommendationKind::DisputedLeanNo,
        }
    }

    /// Render the template for a tally and majority-side confidence
    pub fn render(&self, yes_votes: usize, no_votes: usize, confidence: f64) -> String {
        let total = yes_votes + no_votes;
        let percent = (confidence * 100.0).round() as i64;

        match self {
            RecommendationKind::ConfidentYes => format!(
                "CONSENSUS YES: {}/{} responding agents agree (confidence {}%). \
                 Proceed on the affirmative finding through the standard review process.",
                yes_votes, total, percent
            ),
            RecommendationKind::ConfidentNo => format!(
                "CONSENSUS NO: {}/{} responding agents agree (confidence {}%). \
                 The standard is not met on the current record; document the rationale.",
                no_votes, total, percent
            ),
            RecommendationKind::DisputedLeanYes => format!(
                "CAUTION: agents disagree; the council leans YES ({} yes / {} no, confidence {}%). \
                 Human review is strongly recommended before acting on this finding.",
                yes_votes, no_votes, percent
            ),
            RecommendationKind::DisputedLeanNo => format!(
                "CAUTION: agents disagree; the council leans NO ({} yes / {} no, confidence {}%). \
                 Human review is strongly recommended; gather additional evidence before closing.",
                yes_votes, no_votes, percent
            ),
        }
    }
}
