//! Presentation layer for case-council
//!
//! This crate contains CLI definitions, the request router behind the
//! analysis endpoints, output formatters, and progress reporters.

pub mod api;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use api::{ApiRequest, ApiResponse, ApiRouter, serve};
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressMode, ProgressReporter, SimpleProgress};
