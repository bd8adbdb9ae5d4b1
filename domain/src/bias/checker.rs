//! Pattern-based bias heuristic

use super::terms::{BiasTerm, DEFAULT_TERMS, Severity};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A flagged term in the checked text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasFlag {
    pub term: String,
    pub suggestion: String,
    pub severity: Severity,
}

/// Overall assessment of the checked text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallTone {
    /// No flags
    Neutral,
    /// Flags present, none high severity
    CautionAdvised,
    /// At least one high-severity flag
    Concerning,
}

impl OverallTone {
    fn from_flags(flags: &[BiasFlag]) -> Self {
        match flags.iter().map(|f| f.severity).max() {
            None => OverallTone::Neutral,
            Some(Severity::High) => OverallTone::Concerning,
            Some(_) => OverallTone::CautionAdvised,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallTone::Neutral => "neutral",
            OverallTone::CautionAdvised => "caution_advised",
            OverallTone::Concerning => "concerning",
        }
    }
}

impl std::fmt::Display for OverallTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one bias check
///
/// `has_bias` is true exactly when `flags` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasReport {
    pub has_bias: bool,
    pub flags: Vec<BiasFlag>,
    pub overall_tone: OverallTone,
}

impl BiasReport {
    fn from_flags(flags: Vec<BiasFlag>) -> Self {
        Self {
            has_bias: !flags.is_empty(),
            overall_tone: OverallTone::from_flags(&flags),
            flags,
        }
    }
}

/// Scans free text against a term table
///
/// Matching is case-insensitive on word boundaries, so "claims" does not
/// fire inside "disclaimers". Each term flags at most once per check.
#[derive(Debug, Clone)]
pub struct BiasChecker {
    patterns: Vec<(BiasTerm, Regex)>,
}

impl BiasChecker {
    pub fn new(terms: &[BiasTerm]) -> Self {
        let patterns = terms
            .iter()
            .filter_map(|term| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(term.term).replace(' ', r"\s+"));
                Regex::new(&pattern).ok().map(|re| (*term, re))
            })
            .collect();
        Self { patterns }
    }

    pub fn term_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn check(&self, text: &str) -> BiasReport {
        let flags = self
            .patterns
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(term, _)| BiasFlag {
                term: term.term.to_string(),
                suggestion: term.suggestion.to_string(),
                severity: term.severity,
            })
            .collect();
        BiasReport::from_flags(flags)
    }
}

impl Default for BiasChecker {
    fn default() -> Self {
        Self::new(DEFAULT_TERMS)
    }
}

static DEFAULT_CHECKER: LazyLock<BiasChecker> = LazyLock::new(BiasChecker::default);

/// Check `text` against the default term table
pub fn check(text: &str) -> BiasReport {
    DEFAULT_CHECKER.check(text)
}
