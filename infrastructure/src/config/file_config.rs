//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application
//! parameters via [`FileConfig::to_council_params`].

use council_application::{CouncilParams, DEFAULT_QUESTION};
use council_domain::{QuorumRule, Roster};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("agent_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("request_timeout_seconds cannot be 0")]
    InvalidRequestTimeout,

    #[error("disagreement_threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("invalid quorum rule '{rule}': {reason}")]
    InvalidQuorum { rule: String, reason: String },

    #[error("default_question cannot be empty")]
    EmptyQuestion,
}

/// Raw council configuration from TOML (`[council]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Deadline in seconds covering every attempt of one agent
    pub agent_timeout_seconds: u64,
    pub max_retries: u32,
    /// Quorum rule string ("majority", "atleast:3", "60%", "unanimous")
    pub quorum: String,
    pub disagreement_threshold: f64,
    pub default_question: String,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            agent_timeout_seconds: 120,
            max_retries: 1,
            quorum: "majority".to_string(),
            disagreement_threshold: 0.30,
            default_question: DEFAULT_QUESTION.to_string(),
        }
    }
}

/// Which judgment backend answers for the agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible local server (LM Studio, Ollama)
    #[default]
    Local,
    /// Anthropic Messages API
    Anthropic,
    /// Deterministic canned replies
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Local => "local",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Mock => "mock",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw provider configuration from TOML (`[provider]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub kind: ProviderKind,
    /// Base URL of the OpenAI-compatible server (local) or API host (anthropic)
    pub base_url: Option<String>,
    /// Model name; each kind has its own default
    pub model: Option<String>,
    /// Environment variable holding the Anthropic API key
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// HTTP request timeout; unset leaves only the per-agent deadline
    pub request_timeout_seconds: Option<u64>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Local,
            base_url: None,
            model: None,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            request_timeout_seconds: None,
        }
    }
}

impl FileProviderConfig {
    pub const DEFAULT_LOCAL_URL: &'static str = "http://localhost:1234/v1";
    pub const DEFAULT_ANTHROPIC_URL: &'static str = "https://api.anthropic.com";
    pub const DEFAULT_ANTHROPIC_MODEL: &'static str = "claude-sonnet-4-20250514";
    pub const DEFAULT_LOCAL_MODEL: &'static str = "default";

    /// Base URL, falling back to the kind's default
    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.kind) {
            (Some(url), _) => url.trim_end_matches('/'),
            (None, ProviderKind::Anthropic) => Self::DEFAULT_ANTHROPIC_URL,
            (None, _) => Self::DEFAULT_LOCAL_URL,
        }
    }

    /// Model name, falling back to the kind's default
    pub fn model(&self) -> &str {
        match (&self.model, self.kind) {
            (Some(model), _) => model,
            (None, ProviderKind::Anthropic) => Self::DEFAULT_ANTHROPIC_MODEL,
            (None, _) => Self::DEFAULT_LOCAL_MODEL,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

/// Raw case store configuration from TOML (`[cases]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCasesConfig {
    /// JSON array of case records; absent means an empty store
    pub path: Option<String>,
}

/// Raw logging configuration from TOML (`[logging]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL audit trail path
    pub audit_log: Option<String>,
}

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutputFormat {
    Full,
    Json,
}

/// Raw output configuration from TOML (`[output]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<FileOutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub council: FileCouncilConfig,
    pub provider: FileProviderConfig,
    pub cases: FileCasesConfig,
    pub logging: FileLoggingConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration against the default roster
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.council.agent_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if let Some(0) = self.provider.request_timeout_seconds {
            return Err(ConfigValidationError::InvalidRequestTimeout);
        }

        let threshold = self.council.disagreement_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigValidationError::InvalidThreshold(threshold));
        }

        if self.council.default_question.trim().is_empty() {
            return Err(ConfigValidationError::EmptyQuestion);
        }

        self.quorum_rule()?;
        Ok(())
    }

    /// Parse the quorum rule and check the default roster can satisfy it
    pub fn quorum_rule(&self) -> Result<QuorumRule, ConfigValidationError> {
        let invalid = |reason: String| ConfigValidationError::InvalidQuorum {
            rule: self.council.quorum.clone(),
            reason,
        };

        let rule: QuorumRule = self
            .council
            .quorum
            .parse()
            .map_err(|e: council_domain::DomainError| invalid(e.to_string()))?;
        rule.validate_for(Roster::default().len())
            .map_err(|e| invalid(e.to_string()))?;
        Ok(rule)
    }

    /// Validate and convert into orchestration parameters
    pub fn to_council_params(&self) -> Result<CouncilParams, ConfigValidationError> {
        self.validate()?;

        Ok(CouncilParams::default()
            .with_agent_timeout(Duration::from_secs(self.council.agent_timeout_seconds))
            .with_max_retries(self.council.max_retries)
            .with_quorum(self.quorum_rule()?)
            .with_disagreement_threshold(self.council.disagreement_threshold)
            .with_default_question(self.council.default_question.trim()))
    }
}
