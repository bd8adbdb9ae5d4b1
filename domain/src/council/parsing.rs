//! Agent reply parsing
//!
//! Agents backed by a language model are asked to answer in JSON. These
//! functions pull the structured judgment out of whatever the model actually
//! returned. They are pure domain logic: no I/O, just text handling.
//!
//! # Accepted shapes
//!
//! 1. A bare JSON object
//! 2. A fenced ```` ```json ```` block
//! 3. The outermost `{ ... }` span inside surrounding prose

use super::vote::{Decision, clamp_confidence};
use serde_json::Value;
use thiserror::Error;

/// Confidence assumed when a reply omits it
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Role-specific list fields folded into recommendations, in this order,
/// when a reply carries no `recommendations` of its own.
const FALLBACK_RECOMMENDATION_FIELDS: [&str; 4] = [
    "procedural_notes",
    "trauma_indicators",
    "bias_flags",
    "pattern_flags",
];

/// Why a reply could not be turned into a judgment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplyParseError {
    #[error("reply contains no JSON object")]
    NoJson,

    #[error("reply has no vote field")]
    MissingVote,
}

/// Structured judgment extracted from an agent reply
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    /// `None` when the agent explicitly abstained or voted something other
    /// than YES/NO
    pub decision: Option<Decision>,
    /// Raw vote string as returned, kept for abstention reasons
    pub raw_vote: String,
    pub confidence: f64,
    pub reasoning: String,
    pub citations: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Parse an agent reply.
///
/// # Examples
///
/// ```
/// use council_domain::council::{Decision, parse_agent_reply};
///
/// let reply = parse_agent_reply(r#"{"vote": "yes", "confidence": 0.8, "reasoning": "ok"}"#).unwrap();
/// assert_eq!(reply.decision, Some(Decision::Yes));
/// assert_eq!(reply.confidence, 0.8);
/// ```
pub fn parse_agent_reply(response: &str) -> Result<AgentReply, ReplyParseError> {
    let value = extract_json_object(response).ok_or(ReplyParseError::NoJson)?;

    let raw_vote = value
        .get("vote")
        .or_else(|| value.get("decision"))
        .and_then(Value::as_str)
        .ok_or(ReplyParseError::MissingVote)?
        .trim()
        .to_string();
    let decision = raw_vote.parse::<Decision>().ok();

    let confidence = value
        .get("confidence")
        .and_then(|v| v.as_f64().or_else(|| v.as_str()?.trim().parse().ok()))
        .map(clamp_confidence)
        .unwrap_or(DEFAULT_CONFIDENCE);

    let reasoning = value
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("No reasoning provided.")
        .to_string();

    let citations = string_list(&value, "citations");
    let mut recommendations = string_list(&value, "recommendations");
    if recommendations.is_empty() {
        for field in FALLBACK_RECOMMENDATION_FIELDS {
            recommendations.extend(string_list(&value, field));
        }
    }

    Ok(AgentReply {
        decision,
        raw_vote,
        confidence,
        reasoning,
        citations,
        recommendations,
    })
}

/// Locate a JSON object in free-form model output
fn extract_json_object(response: &str) -> Option<Value> {
    let trimmed = response.trim();

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + "```json".len()..];
        let end = body.find("```").unwrap_or(body.len());
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(body[..end].trim()) {
            return Some(value);
        }
    }

    if let Some(start) = trimmed.find('{')
        && let Some(end) = trimmed.rfind('}')
        && end > start
        && let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&trimmed[start..=end])
    {
        return Some(value);
    }

    None
}

/// Read a list of strings, tolerating a single string or non-string items
fn string_list(value: &Value, field: &str) -> Vec<String> {
    match value.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}
