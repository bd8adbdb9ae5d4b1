//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid case id: {0}")]
    InvalidCaseId(String),

    #[error("Unknown agent role: {0}")]
    UnknownRole(String),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid quorum rule: {0}")]
    InvalidQuorumRule(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::UnknownRole("astrology".to_string());
        assert_eq!(error.to_string(), "Unknown agent role: astrology");
    }
}
