//! Run Analysis use case
//!
//! Convenes the council for one (case, question) pair: every roster agent is
//! consulted concurrently under its own deadline, failures become
//! abstentions, and the surviving votes are reduced to a consensus when the
//! quorum rule is met.

use crate::agents::{Agent, AgentError};
use crate::config::CouncilParams;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::case_store::{CaseStore, CaseStoreError};
use crate::ports::progress::{CouncilProgress, NoProgress};
use council_domain::{
    Abstention, AgentProfile, AgentVerdict, AnalysisRequest, AnalysisResult, CaseContext,
    ConsensusAggregator, ConsensusError, DomainError, Question, Vote,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Request-level failures
///
/// `Clone` so that one failed computation can be handed to every caller
/// waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Case not found: {0}")]
    CaseNotFound(String),

    #[error(
        "Insufficient quorum: {responded} of {roster} agents responded, {required} required"
    )]
    InsufficientQuorum {
        responded: usize,
        required: usize,
        roster: usize,
    },

    #[error("Case store unavailable: {0}")]
    CaseStoreUnavailable(String),

    #[error("Consensus failed: {0}")]
    Consensus(#[from] ConsensusError),

    #[error("Analysis computation failed: {0}")]
    CacheComputationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AnalysisError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::CaseNotFound(_) => "case_not_found",
            AnalysisError::InsufficientQuorum { .. } => "insufficient_quorum",
            AnalysisError::CaseStoreUnavailable(_) => "case_store_unavailable",
            AnalysisError::Consensus(_) => "consensus_failed",
            AnalysisError::CacheComputationFailed(_) => "computation_failed",
            AnalysisError::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl From<CaseStoreError> for AnalysisError {
    fn from(error: CaseStoreError) -> Self {
        match error {
            CaseStoreError::NotFound(id) => AnalysisError::CaseNotFound(id),
            CaseStoreError::Unavailable(reason) => AnalysisError::CaseStoreUnavailable(reason),
        }
    }
}

impl From<DomainError> for AnalysisError {
    fn from(error: DomainError) -> Self {
        AnalysisError::InvalidRequest(error.to_string())
    }
}

/// Use case for running one council analysis
pub struct RunAnalysisUseCase {
    agents: Vec<Arc<dyn Agent>>,
    case_store: Arc<dyn CaseStore>,
    params: CouncilParams,
    audit: Arc<dyn AuditLogger>,
}

impl RunAnalysisUseCase {
    pub fn new(
        agents: Vec<Arc<dyn Agent>>,
        case_store: Arc<dyn CaseStore>,
        params: CouncilParams,
    ) -> Self {
        Self {
            agents,
            case_store,
            params,
            audit: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn params(&self) -> &CouncilParams {
        &self.params
    }

    /// Roster profiles, in roster order
    pub fn roster(&self) -> impl Iterator<Item = &AgentProfile> {
        self.agents.iter().map(|agent| agent.profile())
    }

    /// Canonical id for a case id or case number
    pub async fn resolve_case_id(&self, key: &str) -> Result<String, AnalysisError> {
        Ok(self.case_store.resolve_id(key).await?)
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        self.execute_with_progress(request, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        request: &AnalysisRequest,
        progress: &dyn CouncilProgress,
    ) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();
        let outcome = self.deliberate(request, progress).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(result) => {
                info!(
                    case_id = %request.case_id,
                    decision = %result.decision,
                    yes = result.yes_votes,
                    no = result.no_votes,
                    elapsed_ms,
                    "Council reached a decision"
                );
                self.audit.log(AuditEvent::new(
                    "analysis_completed",
                    json!({
                        "case_id": request.case_id,
                        "question": request.question.content(),
                        "decision": result.decision,
                        "confidence": result.confidence,
                        "yes_votes": result.yes_votes,
                        "no_votes": result.no_votes,
                        "abstained": result.abstentions().count(),
                        "has_disagreement": result.has_disagreement,
                        "elapsed_ms": elapsed_ms,
                    }),
                ));
                progress.on_analysis_complete(result);
            }
            Err(error) => {
                warn!(case_id = %request.case_id, elapsed_ms, "Analysis failed: {}", error);
                self.audit.log(AuditEvent::new(
                    "analysis_failed",
                    json!({
                        "case_id": request.case_id,
                        "question": request.question.content(),
                        "error": error.code(),
                        "message": error.to_string(),
                        "elapsed_ms": elapsed_ms,
                    }),
                ));
                progress.on_analysis_failed(&error.to_string());
            }
        }

        outcome
    }

    async fn deliberate(
        &self,
        request: &AnalysisRequest,
        progress: &dyn CouncilProgress,
    ) -> Result<AnalysisResult, AnalysisError> {
        if self.agents.is_empty() {
            return Err(AnalysisError::InvalidRequest(
                "no agents configured".to_string(),
            ));
        }

        let case = self.case_store.get(&request.case_id).await?;
        let roster = self.agents.len();
        info!(case_id = %request.case_id, agents = roster, "Convening council");
        progress.on_analysis_start(&request.case_id, roster);

        let breakdown = self
            .consult_all(&request.case_id, Arc::new(case), &request.question, progress)
            .await;

        let responded = breakdown.iter().filter(|v| !v.is_abstained()).count();
        if !self.params.quorum.is_satisfied(responded, roster) {
            return Err(AnalysisError::InsufficientQuorum {
                responded,
                required: self.params.quorum.required(roster),
                roster,
            });
        }

        let aggregator = ConsensusAggregator::new(self.params.consensus);
        Ok(aggregator.aggregate(request.question.content(), breakdown)?)
    }

    /// Consult every agent concurrently; the breakdown follows roster order
    async fn consult_all(
        &self,
        case_id: &str,
        case: Arc<CaseContext>,
        question: &Question,
        progress: &dyn CouncilProgress,
    ) -> Vec<AgentVerdict> {
        let mut join_set = JoinSet::new();

        for (index, agent) in self.agents.iter().enumerate() {
            let agent = Arc::clone(agent);
            let case = Arc::clone(&case);
            let question = question.clone();
            let timeout = self.params.agent_timeout;
            let max_retries = self.params.max_retries;

            debug!(case_id, agent = %agent.profile().name, "Dispatching agent");
            join_set.spawn(async move {
                let started = Instant::now();
                let outcome = consult(agent.as_ref(), &case, &question, timeout, max_retries).await;
                (index, outcome, started.elapsed())
            });
        }

        let mut slots: Vec<Option<AgentVerdict>> = vec![None; self.agents.len()];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome, elapsed)) => {
                    let profile = self.agents[index].profile();
                    let verdict = match outcome {
                        Ok(vote) => {
                            info!(
                                case_id,
                                agent = %profile.name,
                                role = %profile.role,
                                decision = %vote.decision,
                                elapsed_ms = elapsed.as_millis() as u64,
                                "Agent responded"
                            );
                            AgentVerdict::Responded(attribute(vote, profile))
                        }
                        Err(error) => self.abstain(case_id, profile, &error.to_string(), elapsed),
                    };
                    progress.on_agent_complete(&verdict);
                    slots[index] = Some(verdict);
                }
                Err(e) => {
                    warn!(case_id, "Agent task join error: {}", e);
                }
            }
        }

        slots
            .into_iter()
            .zip(&self.agents)
            .map(|(slot, agent)| {
                slot.unwrap_or_else(|| {
                    let verdict =
                        self.abstain(case_id, agent.profile(), "agent task failed", Duration::ZERO);
                    progress.on_agent_complete(&verdict);
                    verdict
                })
            })
            .collect()
    }

    fn abstain(
        &self,
        case_id: &str,
        profile: &AgentProfile,
        reason: &str,
        elapsed: Duration,
    ) -> AgentVerdict {
        let elapsed_ms = elapsed.as_millis() as u64;
        warn!(
            case_id,
            agent = %profile.name,
            role = %profile.role,
            elapsed_ms,
            "Agent abstained: {}",
            reason
        );
        self.audit.log(AuditEvent::new(
            "agent_abstained",
            json!({
                "case_id": case_id,
                "agent": profile.name,
                "role": profile.role,
                "reason": reason,
                "elapsed_ms": elapsed_ms,
            }),
        ));
        AgentVerdict::Abstained(Abstention::new(profile, reason))
    }
}

/// One agent's judgment, retried on failure, all attempts under one deadline
async fn consult(
    agent: &dyn Agent,
    case: &CaseContext,
    question: &Question,
    timeout: Duration,
    max_retries: u32,
) -> Result<Vote, AgentError> {
    let attempts = async {
        let mut attempt = 0;
        loop {
            match agent.judge(case, question).await {
                Ok(vote) => return Ok(vote),
                Err(error) if error.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    debug!(agent = %agent.profile().name, attempt, "Retrying after: {}", error);
                }
                Err(error) => return Err(error),
            }
        }
    };

    tokio::time::timeout(timeout, attempts)
        .await
        .unwrap_or(Err(AgentError::Timeout(timeout)))
}

/// Votes are always attributed to the roster identity that was consulted
fn attribute(mut vote: Vote, profile: &AgentProfile) -> Vote {
    vote.agent_name = profile.name.clone();
    vote.agent_role = profile.role;
    vote
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::judgment_backend::BackendError;
    use async_trait::async_trait;
    use council_domain::{Decision, QuorumRule, Roster};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    enum Behavior {
        Vote(Decision, f64),
        Delayed(Duration, Decision, f64),
        Hang,
        Fail,
        FailOnce(Decision, f64),
        Abstain,
    }

    struct MockAgent {
        profile: AgentProfile,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Agent for MockAgent {
        fn profile(&self) -> &AgentProfile {
            &self.profile
        }

        async fn judge(&self, _case: &CaseContext, _q: &Question) -> Result<Vote, AgentError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior.clone() {
                Behavior::Vote(d, c) => Ok(Vote::new(&self.profile, d, c, "mock")),
                Behavior::Delayed(delay, d, c) => {
                    tokio::time::sleep(delay).await;
                    Ok(Vote::new(&self.profile, d, c, "mock"))
                }
                Behavior::Hang => std::future::pending().await,
                Behavior::Fail => Err(BackendError::ConnectionError("refused".into()).into()),
                Behavior::FailOnce(d, c) if call > 0 => Ok(Vote::new(&self.profile, d, c, "mock")),
                Behavior::FailOnce(..) => Err(AgentError::MalformedResponse("garbled".into())),
                Behavior::Abstain => Err(AgentError::Abstained("conflict of interest".into())),
            }
        }
    }

    struct MockCaseStore {
        cases: HashMap<String, CaseContext>,
        unavailable: bool,
    }

    impl MockCaseStore {
        fn with_case(id: &str) -> Self {
            let mut cases = HashMap::new();
            cases.insert(id.to_string(), CaseContext::new(id, "Incident in the lab"));
            Self {
                cases,
                unavailable: false,
            }
        }
    }

    #[async_trait]
    impl CaseStore for MockCaseStore {
        async fn get(&self, key: &str) -> Result<CaseContext, CaseStoreError> {
            if self.unavailable {
                return Err(CaseStoreError::Unavailable("database offline".into()));
            }
            self.cases
                .get(key)
                .cloned()
                .ok_or_else(|| CaseStoreError::NotFound(key.to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingAudit {
        events: Mutex<Vec<&'static str>>,
    }

    impl AuditLogger for RecordingAudit {
        fn log(&self, event: AuditEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    fn agents(behaviors: Vec<Behavior>) -> Vec<Arc<MockAgent>> {
        Roster::default()
            .profiles()
            .iter()
            .zip(behaviors)
            .map(|(profile, behavior)| {
                Arc::new(MockAgent {
                    profile: profile.clone(),
                    behavior,
                    calls: AtomicUsize::new(0),
                })
            })
            .collect()
    }

    fn use_case(agents: &[Arc<MockAgent>], params: CouncilParams) -> RunAnalysisUseCase {
        let agents = agents
            .iter()
            .map(|a| Arc::clone(a) as Arc<dyn Agent>)
            .collect();
        RunAnalysisUseCase::new(agents, Arc::new(MockCaseStore::with_case("0148")), params)
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("0148", Question::new("Within jurisdiction?").unwrap()).unwrap()
    }

    use Decision::{No, Yes};

    #[tokio::test]
    async fn test_unanimous_council() {
        let agents = agents(vec![
            Behavior::Vote(Yes, 0.92),
            Behavior::Vote(Yes, 0.90),
            Behavior::Vote(Yes, 0.85),
            Behavior::Vote(Yes, 0.95),
            Behavior::Vote(Yes, 0.90),
        ]);
        let result = use_case(&agents, CouncilParams::default())
            .execute(&request())
            .await
            .unwrap();

        assert_eq!(result.decision, Yes);
        assert_eq!(result.yes_votes, 5);
        assert!((result.confidence - 0.904).abs() < 1e-9);
        assert!(!result.has_disagreement);
        assert_eq!(result.question, "Within jurisdiction?");
    }

    #[tokio::test(start_paused = true)]
    async fn test_breakdown_follows_roster_order() {
        // Completion order is the reverse of roster order
        let agents = agents(vec![
            Behavior::Delayed(Duration::from_secs(5), Yes, 0.9),
            Behavior::Delayed(Duration::from_secs(4), No, 0.7),
            Behavior::Delayed(Duration::from_secs(3), Yes, 0.8),
            Behavior::Delayed(Duration::from_secs(2), No, 0.6),
            Behavior::Delayed(Duration::from_secs(1), Yes, 0.9),
        ]);
        let result = use_case(&agents, CouncilParams::default())
            .execute(&request())
            .await
            .unwrap();

        let names: Vec<_> = result.agent_breakdown.iter().map(|v| v.agent_name()).collect();
        assert_eq!(names, vec!["Lex", "Sofia", "Equity", "Holmes", "Sentinel"]);
        assert_eq!((result.yes_votes, result.no_votes), (3, 2));
        assert!(result.has_disagreement);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_become_abstentions_within_deadline() {
        let agents = agents(vec![
            Behavior::Vote(Yes, 0.9),
            Behavior::Hang,
            Behavior::Vote(Yes, 0.8),
            Behavior::Hang,
            Behavior::Vote(No, 0.7),
        ]);
        let params = CouncilParams::default().with_agent_timeout(Duration::from_secs(120));

        let started = Instant::now();
        let result = use_case(&agents, params).execute(&request()).await.unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_secs(120));
        assert!(elapsed < Duration::from_secs(121));

        assert_eq!(result.agent_breakdown.len(), 5);
        assert_eq!(result.abstentions().count(), 2);
        let reasons: Vec<_> = result
            .abstentions()
            .map(|a| (a.agent_name.as_str(), a.abstain_reason.as_str()))
            .collect();
        assert_eq!(
            reasons,
            vec![("Sofia", "timed out after 120s"), ("Holmes", "timed out after 120s")]
        );
        assert_eq!(result.vote_summary(), "[●-●-○]");
    }

    #[tokio::test]
    async fn test_insufficient_quorum() {
        let agents = agents(vec![
            Behavior::Vote(Yes, 0.9),
            Behavior::Fail,
            Behavior::Fail,
            Behavior::Vote(No, 0.6),
            Behavior::Fail,
        ]);
        let error = use_case(&agents, CouncilParams::default().with_max_retries(0))
            .execute(&request())
            .await
            .unwrap_err();

        assert_eq!(
            error,
            AnalysisError::InsufficientQuorum {
                responded: 2,
                required: 3,
                roster: 5
            }
        );
        assert_eq!(error.code(), "insufficient_quorum");
    }

    #[tokio::test]
    async fn test_lenient_quorum_accepts_single_responder() {
        let agents = agents(vec![
            Behavior::Fail,
            Behavior::Fail,
            Behavior::Vote(No, 0.6),
            Behavior::Fail,
            Behavior::Fail,
        ]);
        let params = CouncilParams::default()
            .with_max_retries(0)
            .with_quorum(QuorumRule::AtLeast(1));
        let result = use_case(&agents, params).execute(&request()).await.unwrap();
        assert_eq!(result.decision, No);
        assert_eq!(result.responded(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_retried() {
        let agents = agents(vec![
            Behavior::FailOnce(Yes, 0.9),
            Behavior::FailOnce(Yes, 0.9),
            Behavior::FailOnce(Yes, 0.9),
            Behavior::Abstain,
            Behavior::Vote(Yes, 0.9),
        ]);
        let result = use_case(&agents, CouncilParams::default())
            .execute(&request())
            .await
            .unwrap();

        assert_eq!(result.yes_votes, 4);
        assert_eq!(agents[0].calls.load(Ordering::SeqCst), 2);
        // An explicit abstention is an answer, not a failure
        assert_eq!(agents[3].calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            result.abstentions().next().unwrap().abstain_reason,
            "abstained: conflict of interest"
        );
    }

    #[tokio::test]
    async fn test_no_retries_configured() {
        let agents = agents(vec![
            Behavior::FailOnce(Yes, 0.9),
            Behavior::Vote(Yes, 0.9),
            Behavior::Vote(Yes, 0.9),
            Behavior::Vote(Yes, 0.9),
            Behavior::Vote(Yes, 0.9),
        ]);
        let result = use_case(&agents, CouncilParams::default().with_max_retries(0))
            .execute(&request())
            .await
            .unwrap();
        assert_eq!(result.yes_votes, 4);
        assert_eq!(agents[0].calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_case_lookup_errors() {
        let agents = agents(vec![Behavior::Vote(Yes, 0.9); 5]);
        let missing = AnalysisRequest::new("9999", Question::new("Q?").unwrap()).unwrap();
        let error = use_case(&agents, CouncilParams::default())
            .execute(&missing)
            .await
            .unwrap_err();
        assert_eq!(error, AnalysisError::CaseNotFound("9999".to_string()));

        let offline = RunAnalysisUseCase::new(
            agents.iter().map(|a| Arc::clone(a) as Arc<dyn Agent>).collect(),
            Arc::new(MockCaseStore {
                cases: HashMap::new(),
                unavailable: true,
            }),
            CouncilParams::default(),
        );
        let error = offline.execute(&request()).await.unwrap_err();
        assert!(matches!(error, AnalysisError::CaseStoreUnavailable(_)));
        // No agent was consulted for a case that could not be loaded
        assert!(agents.iter().all(|a| a.calls.load(Ordering::SeqCst) == 0));
    }

    #[tokio::test]
    async fn test_audit_events() {
        let agents = agents(vec![
            Behavior::Vote(Yes, 0.9),
            Behavior::Abstain,
            Behavior::Vote(Yes, 0.9),
            Behavior::Vote(Yes, 0.9),
            Behavior::Vote(Yes, 0.9),
        ]);
        let audit = Arc::new(RecordingAudit::default());
        let use_case = use_case(&agents, CouncilParams::default())
            .with_audit_logger(Arc::clone(&audit) as Arc<dyn AuditLogger>);

        use_case.execute(&request()).await.unwrap();
        let missing = AnalysisRequest::new("9999", Question::new("Q?").unwrap()).unwrap();
        let _ = use_case.execute(&missing).await;

        assert_eq!(
            *audit.events.lock().unwrap(),
            vec!["agent_abstained", "analysis_completed", "analysis_failed"]
        );
    }

    #[test]
    fn test_store_errors_map_to_analysis_errors() {
        assert_eq!(
            AnalysisError::from(CaseStoreError::NotFound("7".into())),
            AnalysisError::CaseNotFound("7".into())
        );
        let error = AnalysisError::from(DomainError::InvalidQuestion("empty".into()));
        assert_eq!(error.code(), "invalid_request");
    }
}
