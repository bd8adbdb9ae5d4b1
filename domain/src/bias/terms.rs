//! Loaded, gendered and judgmental phrasing flagged in investigation writing

use serde::{Deserialize, Serialize};

/// How strongly a term colors the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the term table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiasTerm {
    pub term: &'static str,
    pub suggestion: &'static str,
    pub severity: Severity,
}

const fn term(term: &'static str, severity: Severity, suggestion: &'static str) -> BiasTerm {
    BiasTerm {
        term,
        suggestion,
        severity,
    }
}

/// The maintained term table, checked in this order
pub const DEFAULT_TERMS: &[BiasTerm] = &[
    term(
        "emotional",
        Severity::Moderate,
        "Consider 'visible distress' or 'expressed distress' instead of 'emotional'.",
    ),
    term(
        "hysterical",
        Severity::High,
        "This term carries significant gender bias. Use 'distressed' or 'agitated' instead.",
    ),
    term(
        "aggressive",
        Severity::Moderate,
        "Ensure this term is applied equally regardless of gender or race; describe the conduct instead.",
    ),
    term(
        "claims",
        Severity::Low,
        "'Claims' implies doubt. Use 'reports' or 'states'.",
    ),
    term(
        "alleged victim",
        Severity::Moderate,
        "Use 'complainant' for neutral, consistent terminology.",
    ),
    term(
        "admitted",
        Severity::Low,
        "'Admitted' implies wrongdoing. Use 'stated' or 'acknowledged'.",
    ),
    term(
        "confessed",
        Severity::Moderate,
        "'Confessed' presumes guilt. Use 'stated'.",
    ),
    term(
        "promiscuous",
        Severity::High,
        "Sexual history is irrelevant to the finding and this term is judgmental. Remove it.",
    ),
    term(
        "provocative",
        Severity::High,
        "Describing dress or behavior as provocative shifts blame to the complainant. Remove it.",
    ),
    term(
        "asking for it",
        Severity::High,
        "Victim-blaming language. Remove it and describe only observed conduct.",
    ),
    term(
        "bossy",
        Severity::Moderate,
        "Gendered descriptor. Use 'directive' or describe the specific behavior.",
    ),
    term(
        "shrill",
        Severity::Moderate,
        "Gendered descriptor. Describe volume or tone factually.",
    ),
    term(
        "overreacting",
        Severity::Moderate,
        "Minimizes the reported experience. Describe the response without judging it.",
    ),
    term(
        "histrionic",
        Severity::High,
        "Clinical-sounding and gendered. Use 'distressed' or describe the behavior.",
    ),
    term(
        "drama",
        Severity::Low,
        "Trivializes the report. Use 'conflict' or describe the events.",
    ),
    term(
        "irrational",
        Severity::Moderate,
        "Judgmental. Describe the specific statements or actions instead.",
    ),
];
