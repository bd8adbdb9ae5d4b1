//! Application layer for case-council
//!
//! This crate contains the orchestrator use case, the single-flight analysis
//! cache, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod agents;
pub mod cache;
pub mod config;
pub mod ports;
pub mod service;
pub mod use_cases;

// Re-export commonly used types
pub use agents::{Agent, AgentError, LlmAgent, build_agents};
pub use cache::AnalysisCache;
pub use config::{CouncilParams, DEFAULT_QUESTION};
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    case_store::{CaseStore, CaseStoreError},
    judgment_backend::{BackendError, JudgmentBackend},
    progress::{CouncilProgress, NoProgress},
};
pub use service::{CouncilService, HealthReport};
pub use use_cases::run_analysis::{AnalysisError, RunAnalysisUseCase};
