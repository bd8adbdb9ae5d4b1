//! Quorum rules
//!
//! A quorum rule decides how many agents must actually respond before a
//! consensus may be presented as final. It is evaluated against the roster
//! size, not against the number of responders.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Minimum-responders rule for a council run
///
/// - `Majority`: strictly more than half of the roster (default)
/// - `Unanimous`: every roster agent must respond
/// - `AtLeast(n)`: at least n agents must respond
/// - `Percentage(p)`: at least p% of the roster must respond
///
/// # Example
///
/// ```
/// use council_domain::council::QuorumRule;
///
/// let rule = QuorumRule::Majority;
/// assert_eq!(rule.required(5), 3);
/// assert!(rule.is_satisfied(3, 5));
/// assert!(!rule.is_satisfied(2, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum QuorumRule {
    /// More than half of the roster (n/2 + 1)
    #[default]
    Majority,

    /// The whole roster
    Unanimous,

    /// At least n responders
    AtLeast(usize),

    /// At least this percentage of the roster (0-100)
    Percentage(u8),
}

impl QuorumRule {
    /// Minimum number of responders required for a roster of `roster_size`
    ///
    /// Never less than one: a consensus needs at least one opinion.
    pub fn required(&self, roster_size: usize) -> usize {
        let required = match self {
            QuorumRule::Majority => roster_size / 2 + 1,
            QuorumRule::Unanimous => roster_size,
            QuorumRule::AtLeast(n) => *n,
            QuorumRule::Percentage(p) => {
                (roster_size as f64 * (*p as f64 / 100.0)).ceil() as usize
            }
        };
        required.max(1)
    }

    /// Check whether `responded` agents out of `roster_size` form a quorum
    pub fn is_satisfied(&self, responded: usize, roster_size: usize) -> bool {
        roster_size > 0 && responded >= self.required(roster_size)
    }

    /// Reject rules that no run over `roster_size` agents could ever satisfy
    pub fn validate_for(&self, roster_size: usize) -> Result<(), DomainError> {
        if let QuorumRule::Percentage(p) = self
            && *p > 100
        {
            return Err(DomainError::InvalidQuorumRule(format!(
                "percentage {} exceeds 100",
                p
            )));
        }
        if self.required(roster_size) > roster_size {
            return Err(DomainError::InvalidQuorumRule(format!(
                "{} requires {} responders but the roster has {}",
                self,
                self.required(roster_size),
                roster_size
            )));
        }
        Ok(())
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> String {
        match self {
            QuorumRule::Majority => "majority of the roster".to_string(),
            QuorumRule::Unanimous => "entire roster".to_string(),
            QuorumRule::AtLeast(n) => format!("at least {} responders", n),
            QuorumRule::Percentage(p) => format!("at least {}% of the roster", p),
        }
    }

    /// Canonical config spelling, accepted back by `FromStr`
    pub fn config_string(&self) -> String {
        match self {
            QuorumRule::Majority => "majority".to_string(),
            QuorumRule::Unanimous => "unanimous".to_string(),
            QuorumRule::AtLeast(n) => format!("atleast:{}", n),
            QuorumRule::Percentage(p) => format!("{}%", p),
        }
    }
}

impl std::fmt::Display for QuorumRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for QuorumRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidQuorumRule(format!("{}: {}", reason, s));

        match s.trim().to_lowercase().as_str() {
            "majority" => Ok(QuorumRule::Majority),
            "unanimous" | "all" => Ok(QuorumRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => {
                let n: usize = s
                    .split(':')
                    .nth(1)
                    .ok_or_else(|| invalid("missing number after atleast:"))?
                    .trim()
                    .parse()
                    .map_err(|_| invalid("invalid number for atleast"))?;
                Ok(QuorumRule::AtLeast(n))
            }
            s if s.starts_with("percentage:") || s.ends_with('%') => {
                let num_str = s.trim_start_matches("percentage:").trim_end_matches('%');
                let p: u8 = num_str
                    .trim()
                    .parse()
                    .map_err(|_| invalid("invalid percentage"))?;
                Ok(QuorumRule::Percentage(p))
            }
            _ => Err(invalid(
                "expected majority, unanimous, atleast:N, percentage:N or N%",
            )),
        }
    }
}

impl TryFrom<String> for QuorumRule {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuorumRule> for String {
    fn from(rule: QuorumRule) -> Self {
        rule.config_string()
    }
}
