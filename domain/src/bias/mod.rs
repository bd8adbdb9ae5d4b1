//! Bias heuristic checker
//!
//! Stateless and independent of the voting pipeline; usable on any free
//! text such as draft findings or intake narratives.

pub mod checker;
pub mod terms;

pub use checker::{BiasChecker, BiasFlag, BiasReport, OverallTone, check};
pub use terms::{BiasTerm, DEFAULT_TERMS, Severity};
