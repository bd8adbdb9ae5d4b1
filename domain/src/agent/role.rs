//! Agent specializations

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The fixed set of specializations a council agent can hold
///
/// # Example
///
/// ```
/// use council_domain::agent::AgentRole;
///
/// let role: AgentRole = "risk-assessment".parse().unwrap();
/// assert_eq!(role, AgentRole::RiskAssessment);
/// assert_eq!(role.label(), "Risk Assessment");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentRole {
    /// Legal standards and jurisdiction
    LegalCompliance,
    /// Psychological impact and trauma responses
    TraumaInformedAnalysis,
    /// Fairness and equitable treatment
    BiasDetection,
    /// Corroboration and evidentiary weight
    EvidenceAnalysis,
    /// Safety, retaliation and pattern risk
    RiskAssessment,
}

impl AgentRole {
    /// All roles, in roster order
    pub const ALL: [AgentRole; 5] = [
        AgentRole::LegalCompliance,
        AgentRole::TraumaInformedAnalysis,
        AgentRole::BiasDetection,
        AgentRole::EvidenceAnalysis,
        AgentRole::RiskAssessment,
    ];

    /// Stable machine identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::LegalCompliance => "legal-compliance",
            AgentRole::TraumaInformedAnalysis => "trauma-informed-analysis",
            AgentRole::BiasDetection => "bias-detection",
            AgentRole::EvidenceAnalysis => "evidence-analysis",
            AgentRole::RiskAssessment => "risk-assessment",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            AgentRole::LegalCompliance => "Legal Compliance",
            AgentRole::TraumaInformedAnalysis => "Trauma-Informed Analysis",
            AgentRole::BiasDetection => "Bias Detection",
            AgentRole::EvidenceAnalysis => "Evidence Analysis",
            AgentRole::RiskAssessment => "Risk Assessment",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        AgentRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(
            "legal_compliance".parse::<AgentRole>().unwrap(),
            AgentRole::LegalCompliance
        );
        assert_eq!(
            "Evidence Analysis".parse::<AgentRole>().unwrap(),
            AgentRole::EvidenceAnalysis
        );
        assert!("astrology".parse::<AgentRole>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&AgentRole::TraumaInformedAnalysis).unwrap();
        assert_eq!(json, "\"trauma-informed-analysis\"");
    }

    #[test]
    fn test_display_matches_as_str() {
        for role in AgentRole::ALL {
            assert_eq!(role.to_string(), role.as_str());
        }
    }
}
