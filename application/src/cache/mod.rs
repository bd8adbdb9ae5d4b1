//! Analysis result caching

pub mod analysis_cache;

pub use analysis_cache::AnalysisCache;
