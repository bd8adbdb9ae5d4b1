//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A yes/no policy question put to the council (Value Object)
///
/// The content is stored trimmed, so two requests that differ only in
/// surrounding whitespace share one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Question {
    content: String,
}

impl Question {
    /// Create a new question, rejecting empty or whitespace-only content
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Question {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Question::new(value)
    }
}

impl From<Question> for String {
    fn from(question: Question) -> Self {
        question.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_creation() {
        let q = Question::new("Is this within jurisdiction?").unwrap();
        assert_eq!(q.content(), "Is this within jurisdiction?");
    }

    #[test]
    fn test_question_is_trimmed() {
        let q = Question::new("  Is this within jurisdiction?\n").unwrap();
        assert_eq!(q.content(), "Is this within jurisdiction?");
    }

    #[test]
    fn test_empty_question_rejected() {
        assert!(Question::new("").is_err());
        assert!(Question::new("   ").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<Question, _> = serde_json::from_str("\"Valid?\"");
        assert!(ok.is_ok());

        let empty: Result<Question, _> = serde_json::from_str("\"  \"");
        assert!(empty.is_err());
    }
}
