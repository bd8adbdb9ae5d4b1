//! Analysis requests and their cache identity

use crate::core::error::DomainError;
use crate::core::question::Question;
use serde::{Deserialize, Serialize};

/// A request to analyze one case against one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAnalysisRequest")]
pub struct AnalysisRequest {
    pub case_id: String,
    pub question: Question,
}

#[derive(Deserialize)]
struct RawAnalysisRequest {
    case_id: String,
    question: Question,
}

impl TryFrom<RawAnalysisRequest> for AnalysisRequest {
    type Error = DomainError;

    fn try_from(raw: RawAnalysisRequest) -> Result<Self, Self::Error> {
        AnalysisRequest::new(raw.case_id, raw.question)
    }
}

impl AnalysisRequest {
    pub fn new(case_id: impl Into<String>, question: Question) -> Result<Self, DomainError> {
        let case_id = case_id.into().trim().to_string();
        if case_id.is_empty() {
            return Err(DomainError::InvalidCaseId(
                "case id cannot be empty".to_string(),
            ));
        }
        Ok(Self { case_id, question })
    }

    pub fn key(&self) -> AnalysisKey {
        AnalysisKey::new(&self.case_id, &self.question)
    }
}

/// Identity of a cached analysis: `(case_id, question)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisKey {
    pub case_id: String,
    pub question: String,
}

impl AnalysisKey {
    pub fn new(case_id: &str, question: &Question) -> Self {
        Self {
            case_id: case_id.to_string(),
            question: question.content().to_string(),
        }
    }
}

impl std::fmt::Display for AnalysisKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.case_id, self.question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_case_id() {
        let q = Question::new("Q?").unwrap();
        let request = AnalysisRequest::new(" 0148 ", q).unwrap();
        assert_eq!(request.case_id, "0148");
    }

    #[test]
    fn test_empty_case_id_rejected() {
        let q = Question::new("Q?").unwrap();
        assert!(AnalysisRequest::new("  ", q).is_err());
    }

    #[test]
    fn test_keys_differ_by_question() {
        let a = AnalysisRequest::new("0148", Question::new("A?").unwrap()).unwrap();
        let b = AnalysisRequest::new("0148", Question::new("B?").unwrap()).unwrap();
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), a.clone().key());
    }

    #[test]
    fn test_deserialize_from_api_body() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"case_id": "0148", "question": "Within scope?"}"#).unwrap();
        assert_eq!(request.question.content(), "Within scope?");
    }

    #[test]
    fn test_deserialize_validates_case_id() {
        let padded: AnalysisRequest =
            serde_json::from_str(r#"{"case_id": " 0148 ", "question": "Q?"}"#).unwrap();
        assert_eq!(padded.case_id, "0148");

        let blank = serde_json::from_str::<AnalysisRequest>(r#"{"case_id": "  ", "question": "Q?"}"#);
        assert!(blank.is_err());
    }
}
