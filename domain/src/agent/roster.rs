//! Agent identities and the fixed council roster

use super::role::AgentRole;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identity of one council agent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Unique, stable name (e.g. "Lex")
    pub name: String,
    /// Specialization
    pub role: AgentRole,
}

impl AgentProfile {
    pub fn new(name: impl Into<String>, role: AgentRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

impl std::fmt::Display for AgentProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.role.label())
    }
}

/// The ordered set of agents consulted for every analysis
///
/// Order is significant: result breakdowns follow roster order regardless of
/// the order in which agents answer.
///
/// # Example
///
/// ```
/// use council_domain::agent::Roster;
///
/// let roster = Roster::default();
/// assert_eq!(roster.len(), 5);
/// assert_eq!(roster.profiles()[0].name, "Lex");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    profiles: Vec<AgentProfile>,
}

impl Roster {
    /// Build a roster, rejecting empty rosters and duplicate names
    pub fn new(profiles: Vec<AgentProfile>) -> Result<Self, DomainError> {
        if profiles.is_empty() {
            return Err(DomainError::InvalidRoster(
                "roster must contain at least one agent".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for profile in &profiles {
            if profile.name.trim().is_empty() {
                return Err(DomainError::InvalidRoster(
                    "agent name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(profile.name.as_str()) {
                return Err(DomainError::InvalidRoster(format!(
                    "duplicate agent name: {}",
                    profile.name
                )));
            }
        }

        Ok(Self { profiles })
    }

    pub fn profiles(&self) -> &[AgentProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }
}

impl Default for Roster {
    /// The standard five-member council: one agent per role
    fn default() -> Self {
        Self {
            profiles: vec![
                AgentProfile::new("Lex", AgentRole::LegalCompliance),
                AgentProfile::new("Sofia", AgentRole::TraumaInformedAnalysis),
                AgentProfile::new("Equity", AgentRole::BiasDetection),
                AgentProfile::new("Holmes", AgentRole::EvidenceAnalysis),
                AgentProfile::new("Sentinel", AgentRole::RiskAssessment),
            ],
        }
    }
}
