//! Infrastructure layer for case-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: judgment backends, the case store,
//! the JSONL audit logger, and configuration file loading.

pub mod backends;
pub mod case_store;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use backends::{AnthropicBackend, LocalBackend, ScriptedBackend, build_backend};
pub use case_store::{CaseFileError, InMemoryCaseStore};
pub use config::{
    ConfigLoader, ConfigValidationError, FileCasesConfig, FileConfig, FileCouncilConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat, FileProviderConfig, ProviderKind,
};
pub use logging::JsonlAuditLogger;
