//! Judgment backend port
//!
//! Defines the interface for asking a language model for one judgment.

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level errors from a judgment backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway to whatever model produces agent judgments
///
/// One call is one stateless completion: a system prompt fixing the agent's
/// persona and reply contract, and a user prompt carrying the case.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait JudgmentBackend: Send + Sync {
    /// Short identifier used in logs and health output (e.g. "local")
    fn name(&self) -> &str;

    /// Run one completion and return the raw reply text
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
    -> Result<String, BackendError>;
}
