//! Case store port
//!
//! Cases are owned elsewhere; the council only reads them.

use async_trait::async_trait;
use council_domain::CaseContext;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaseStoreError {
    #[error("Case not found: {0}")]
    NotFound(String),

    #[error("Case store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to case records
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Look a case up by id or case number
    async fn get(&self, key: &str) -> Result<CaseContext, CaseStoreError>;

    /// Canonical id of the case `key` names
    ///
    /// Results are cached under this id, so every alias of a case shares
    /// one entry.
    async fn resolve_id(&self, key: &str) -> Result<String, CaseStoreError> {
        self.get(key).await.map(|case| case.id)
    }
}
