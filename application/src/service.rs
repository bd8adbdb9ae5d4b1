//! Council service facade
//!
//! Composes the analysis use case with the single-flight cache and the bias
//! checker. This is what the presentation layer talks to.

use crate::cache::AnalysisCache;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::progress::{CouncilProgress, NoProgress};
use crate::use_cases::run_analysis::{AnalysisError, RunAnalysisUseCase};
use council_domain::{AnalysisKey, AnalysisRequest, AnalysisResult, BiasChecker, BiasReport, Question};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Liveness summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub provider: String,
    pub roster: Vec<String>,
    pub cached_entries: usize,
}

pub struct CouncilService {
    use_case: Arc<RunAnalysisUseCase>,
    cache: Arc<AnalysisCache>,
    bias: BiasChecker,
    audit: Arc<dyn AuditLogger>,
    progress: Arc<dyn CouncilProgress>,
    provider: String,
}

impl CouncilService {
    pub fn new(use_case: RunAnalysisUseCase) -> Self {
        Self {
            use_case: Arc::new(use_case),
            cache: Arc::new(AnalysisCache::new()),
            bias: BiasChecker::default(),
            audit: Arc::new(NoAuditLogger),
            progress: Arc::new(NoProgress),
            provider: "unknown".to_string(),
        }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn CouncilProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_provider_name(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_bias_checker(mut self, bias: BiasChecker) -> Self {
        self.bias = bias;
        self
    }

    /// The configured default question
    pub fn default_question(&self) -> Result<Question, AnalysisError> {
        Ok(self.use_case.params().default_question()?)
    }

    /// Analyze a case, reusing a stored or running analysis unless `force`
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
        force: bool,
    ) -> Result<Arc<AnalysisResult>, AnalysisError> {
        let request = AnalysisRequest {
            case_id: self.use_case.resolve_case_id(&request.case_id).await?,
            question: request.question,
        };
        let key = request.key();
        let use_case = Arc::clone(&self.use_case);
        let progress = Arc::clone(&self.progress);
        let computation = async move {
            use_case
                .execute_with_progress(&request, progress.as_ref())
                .await
        };

        if force {
            self.cache.recompute(key, computation).await
        } else {
            self.cache.run_or_reuse(key, || computation).await
        }
    }

    /// Analyze a case against the default question
    pub async fn analyze_default(&self, case_id: &str) -> Result<Arc<AnalysisResult>, AnalysisError> {
        let request = AnalysisRequest::new(case_id, self.default_question()?)?;
        self.analyze(request, false).await
    }

    /// Stored analysis for a case and question; never starts a computation
    pub async fn cached(&self, case_id: &str, question: &Question) -> Option<Arc<AnalysisResult>> {
        let case_id = self.use_case.resolve_case_id(case_id).await.ok()?;
        self.cache.get(&AnalysisKey::new(&case_id, question))
    }

    /// Forget every stored or running analysis for a case
    ///
    /// A case already gone from the store is evicted under the id as given.
    pub async fn evict(&self, case_id: &str) -> usize {
        let case_id = match self.use_case.resolve_case_id(case_id).await {
            Ok(id) => id,
            Err(e) => {
                debug!(case_id, "Evicting unresolved case id: {}", e);
                case_id.trim().to_string()
            }
        };
        let removed = self.cache.evict_case(&case_id);
        info!(%case_id, removed, "Evicted cached analyses");
        removed
    }

    pub fn bias_check(&self, text: &str) -> BiasReport {
        let report = self.bias.check(text);
        self.audit.log(AuditEvent::new(
            "bias_checked",
            json!({
                "chars": text.chars().count(),
                "has_bias": report.has_bias,
                "terms": report.flags.iter().map(|f| f.term.as_str()).collect::<Vec<_>>(),
                "overall_tone": report.overall_tone,
            }),
        ));
        report
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "ok",
            provider: self.provider.clone(),
            roster: self.use_case.roster().map(|p| p.name.clone()).collect(),
            cached_entries: self.cache.len(),
        }
    }
}
