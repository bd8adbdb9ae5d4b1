//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`] — a validated yes/no question to pose to the council
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod question;
