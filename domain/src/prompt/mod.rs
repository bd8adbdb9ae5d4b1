//! Prompt domain
//!
//! Role-specific prompts handed to each council agent.

mod template;

pub use template::AgentPromptTemplate;
