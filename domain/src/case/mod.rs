//! Case context consumed by the council.
//!
//! Cases are owned by an external case store; the engine only reads them.

use serde::{Deserialize, Serialize};

/// Read-only view of a case, as handed to each agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseContext {
    /// Stable case identifier
    pub id: String,
    /// Human-facing case number (e.g. "NW-2025-TIX-0148")
    #[serde(default)]
    pub case_number: String,
    /// Complaint category
    #[serde(default)]
    pub category: String,
    /// Narrative description of the incident
    #[serde(default)]
    pub description: String,
    /// Incident date as reported
    #[serde(default)]
    pub incident_date: Option<String>,
    /// Incident location, if known
    #[serde(default)]
    pub incident_location: Option<String>,
    /// Whether the conduct is ongoing
    #[serde(default)]
    pub is_ongoing: bool,
    /// Whether the intake flagged a crisis
    #[serde(default)]
    pub is_crisis: bool,
    /// Short summaries of submitted evidence
    #[serde(default)]
    pub evidence_summary: Vec<String>,
}

impl CaseContext {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            case_number: String::new(),
            category: String::new(),
            description: description.into(),
            incident_date: None,
            incident_location: None,
            is_ongoing: false,
            is_crisis: false,
            evidence_summary: Vec::new(),
        }
    }

    pub fn with_case_number(mut self, case_number: impl Into<String>) -> Self {
        self.case_number = case_number.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_incident(
        mut self,
        date: impl Into<String>,
        location: Option<String>,
    ) -> Self {
        self.incident_date = Some(date.into());
        self.incident_location = location;
        self
    }

    pub fn ongoing(mut self, is_ongoing: bool) -> Self {
        self.is_ongoing = is_ongoing;
        self
    }

    pub fn crisis(mut self, is_crisis: bool) -> Self {
        self.is_crisis = is_crisis;
        self
    }

    pub fn with_evidence(mut self, summary: impl Into<String>) -> Self {
        self.evidence_summary.push(summary.into());
        self
    }

    /// Whether this case is addressed by `key`, which may be either the
    /// case id or its case number.
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || (!self.case_number.is_empty() && self.case_number == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_id_or_case_number() {
        let case = CaseContext::new("0148", "Assault report").with_case_number("NW-2025-TIX-0148");

        assert!(case.matches("0148"));
        assert!(case.matches("NW-2025-TIX-0148"));
        assert!(!case.matches("0149"));
    }

    #[test]
    fn test_empty_case_number_never_matches() {
        let case = CaseContext::new("0148", "Assault report");
        assert!(!case.matches(""));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let case: CaseContext =
            serde_json::from_str(r#"{"id": "c1", "description": "text"}"#).unwrap();
        assert_eq!(case.id, "c1");
        assert!(case.evidence_summary.is_empty());
        assert!(!case.is_crisis);
    }
}
