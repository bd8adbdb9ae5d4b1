//! Output formatting for analysis results and bias reports

pub mod console;
pub mod formatter;
