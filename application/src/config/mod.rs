//! Application-level configuration.
//!
//! - [`CouncilParams`] — orchestration control (timeouts, retries, quorum, threshold)

pub mod council_params;

pub use council_params::{CouncilParams, DEFAULT_QUESTION};
