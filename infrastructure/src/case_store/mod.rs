//! Case store adapter
//!
//! [`InMemoryCaseStore`] holds case records loaded once at startup, either
//! from a JSON array file (`[cases] path`) or built in code. Lookup accepts
//! the case id or the human-facing case number.

use async_trait::async_trait;
use council_application::{CaseStore, CaseStoreError};
use council_domain::CaseContext;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors loading a case file
#[derive(Error, Debug)]
pub enum CaseFileError {
    #[error("failed to read case file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse case file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("duplicate case id: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseStore {
    cases: Vec<CaseContext>,
}

impl InMemoryCaseStore {
    /// Build a store, rejecting duplicate ids
    pub fn new(cases: Vec<CaseContext>) -> Result<Self, CaseFileError> {
        let mut seen = HashSet::new();
        for case in &cases {
            if !seen.insert(case.id.as_str()) {
                return Err(CaseFileError::DuplicateId(case.id.clone()));
            }
        }
        Ok(Self { cases })
    }

    /// Load a JSON array of case records
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CaseFileError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CaseFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cases: Vec<CaseContext> =
            serde_json::from_str(&content).map_err(|source| CaseFileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), cases = cases.len(), "Loaded case file");
        Self::new(cases)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Exact id match first, then any case the key otherwise matches
    fn find(&self, key: &str) -> Result<&CaseContext, CaseStoreError> {
        let key = key.trim();
        self.cases
            .iter()
            .find(|case| case.id == key)
            .or_else(|| self.cases.iter().find(|case| case.matches(key)))
            .ok_or_else(|| CaseStoreError::NotFound(key.to_string()))
    }
}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn get(&self, key: &str) -> Result<CaseContext, CaseStoreError> {
        let case = self.find(key)?;
        debug!(key, case_id = %case.id, "Case lookup hit");
        Ok(case.clone())
    }

    async fn resolve_id(&self, key: &str) -> Result<String, CaseStoreError> {
        self.find(key).map(|case| case.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CASES: &str = include_str!("../../../data/cases.json");

    #[tokio::test]
    async fn test_lookup_by_id_or_case_number() {
        let store = InMemoryCaseStore::new(vec![
            CaseContext::new("0148", "Assault report").with_case_number("NW-2025-TIX-0148"),
            CaseContext::new("0149", "Discrimination report").with_case_number("NW-2025-TIX-0149"),
        ])
        .unwrap();

        assert_eq!(store.get("0149").await.unwrap().id, "0149");
        assert_eq!(store.get("NW-2025-TIX-0148").await.unwrap().id, "0148");
        assert_eq!(store.get(" 0148 ").await.unwrap().id, "0148");
        assert_eq!(
            store.get("0150").await.unwrap_err(),
            CaseStoreError::NotFound("0150".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_id_maps_aliases_to_id() {
        let store = InMemoryCaseStore::new(vec![
            CaseContext::new("0148", "Assault report").with_case_number("NW-2025-TIX-0148"),
        ])
        .unwrap();

        assert_eq!(store.resolve_id("NW-2025-TIX-0148").await.unwrap(), "0148");
        assert_eq!(store.resolve_id(" 0148").await.unwrap(), "0148");
        assert!(matches!(
            store.resolve_id("NW-2025-TIX-0149").await,
            Err(CaseStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemoryCaseStore::default();
        assert!(store.is_empty());
        assert!(matches!(
            store.get("0148").await,
            Err(CaseStoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = InMemoryCaseStore::new(vec![
            CaseContext::new("0148", "first"),
            CaseContext::new("0148", "second"),
        ]);
        assert!(matches!(result, Err(CaseFileError::DuplicateId(id)) if id == "0148"));
    }

    #[tokio::test]
    async fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CASES.as_bytes()).unwrap();

        let store = InMemoryCaseStore::from_json_file(file.path()).unwrap();
        assert_eq!(store.len(), 3);

        let case = store.get("NW-2025-TIX-0148").await.unwrap();
        assert_eq!(case.category, "Title IX - Sexual Assault");
        assert!(case.is_crisis);
        assert_eq!(case.evidence_summary.len(), 4);

        let ongoing = store.get("0149").await.unwrap();
        assert!(ongoing.is_ongoing);
        assert!(ongoing.incident_date.is_none());
    }

    #[test]
    fn test_from_json_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            InMemoryCaseStore::from_json_file(&missing),
            Err(CaseFileError::Io { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{\"id\": \"0148\"}").unwrap();
        assert!(matches!(
            InMemoryCaseStore::from_json_file(&broken),
            Err(CaseFileError::Parse { .. })
        ));
    }
}
