//! Transport-agnostic request router
//!
//! Maps `(method, path, query, body)` onto [`CouncilService`] calls and
//! returns an HTTP-style status with a JSON body. The serve loop (or any
//! HTTP front end) only has to move [`ApiRequest`]/[`ApiResponse`] values.
//!
//! | Method | Path | Action |
//! |--------|------|--------|
//! | POST | `/analyze` | `{case_id, question?, force?}` → analysis |
//! | GET | `/analyze/cached/{case_id}` | stored analysis or 404, `?question=` optional |
//! | DELETE | `/analyze/cached/{case_id}` | evict every stored analysis of the case |
//! | GET | `/analyze/title-ix/{case_id}` | analysis for the default question |
//! | POST | `/bias-check` | `{text}` → bias report |
//! | GET | `/health` | liveness summary |

use council_application::{AnalysisError, CouncilService};
use council_domain::{AnalysisRequest, AnalysisResult, Question};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// One request, as carried by the serve protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Value,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: BTreeMap::new(),
            body: Value::Null,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": code, "message": message.into() }),
        }
    }

    fn analysis(result: Arc<AnalysisResult>) -> Self {
        match serde_json::to_value(result.as_ref()) {
            Ok(body) => Self::ok(body),
            Err(e) => Self::error(500, "serialization_failed", e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<AnalysisError> for ApiResponse {
    fn from(error: AnalysisError) -> Self {
        let message = error.to_string();
        match error {
            AnalysisError::CaseNotFound(case_id) => Self {
                status: 404,
                body: json!({ "error": "case_not_found", "message": message, "case_id": case_id }),
            },
            AnalysisError::InvalidRequest(_) => Self::error(400, "invalid_request", message),
            AnalysisError::InsufficientQuorum {
                responded,
                required,
                roster,
            } => Self {
                status: 503,
                body: json!({
                    "error": "insufficient_quorum",
                    "message": message,
                    "responded": responded,
                    "required": required,
                    "roster": roster,
                }),
            },
            other => Self::error(500, other.code(), message),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeBody {
    case_id: String,
    question: Option<String>,
    #[serde(default)]
    force: bool,
}

#[derive(Debug, Deserialize)]
struct BiasCheckBody {
    text: String,
}

pub struct ApiRouter {
    service: Arc<CouncilService>,
}

impl ApiRouter {
    pub fn new(service: Arc<CouncilService>) -> Self {
        Self { service }
    }

    pub async fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let method = request.method.to_ascii_uppercase();
        let segments: Vec<&str> = request
            .path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        debug!(method = %method, path = %request.path, "Routing request");

        match (method.as_str(), segments.as_slice()) {
            ("POST", ["analyze"]) => self.analyze(&request.body).await,
            ("GET", ["analyze", "cached", case_id]) => {
                self.cached(case_id, request.query.get("question")).await
            }
            ("DELETE", ["analyze", "cached", case_id]) => self.evict(case_id).await,
            ("GET", ["analyze", "title-ix", case_id]) => self.title_ix(case_id).await,
            ("POST", ["bias-check"]) => self.bias_check(&request.body),
            ("GET", ["health"]) => match serde_json::to_value(self.service.health()) {
                Ok(body) => ApiResponse::ok(body),
                Err(e) => ApiResponse::error(500, "serialization_failed", e.to_string()),
            },
            (_, ["analyze"])
            | (_, ["analyze", "cached", _])
            | (_, ["analyze", "title-ix", _])
            | (_, ["bias-check"])
            | (_, ["health"]) => ApiResponse::error(
                405,
                "method_not_allowed",
                format!("{} not allowed on {}", method, request.path),
            ),
            _ => ApiResponse::error(404, "not_found", format!("no route for {}", request.path)),
        }
    }

    async fn analyze(&self, body: &Value) -> ApiResponse {
        let body: AnalyzeBody = match serde_json::from_value(body.clone()) {
            Ok(body) => body,
            Err(e) => return ApiResponse::error(400, "invalid_request", e.to_string()),
        };

        let question = match self.question(body.question.as_deref()) {
            Ok(question) => question,
            Err(response) => return response,
        };
        let request = match AnalysisRequest::new(&body.case_id, question) {
            Ok(request) => request,
            Err(e) => return AnalysisError::from(e).into(),
        };

        match self.service.analyze(request, body.force).await {
            Ok(result) => ApiResponse::analysis(result),
            Err(e) => e.into(),
        }
    }

    async fn title_ix(&self, case_id: &str) -> ApiResponse {
        match self.service.analyze_default(case_id).await {
            Ok(result) => ApiResponse::analysis(result),
            Err(e) => e.into(),
        }
    }

    async fn cached(&self, case_id: &str, question: Option<&String>) -> ApiResponse {
        let question = match self.question(question.map(String::as_str)) {
            Ok(question) => question,
            Err(response) => return response,
        };

        match self.service.cached(case_id, &question).await {
            Some(result) => ApiResponse::analysis(result),
            None => ApiResponse::error(
                404,
                "not_cached",
                format!("No stored analysis for case {}", case_id),
            ),
        }
    }

    async fn evict(&self, case_id: &str) -> ApiResponse {
        let evicted = self.service.evict(case_id).await;
        ApiResponse::ok(json!({ "case_id": case_id, "evicted": evicted }))
    }

    fn bias_check(&self, body: &Value) -> ApiResponse {
        let body: BiasCheckBody = match serde_json::from_value(body.clone()) {
            Ok(body) => body,
            Err(e) => return ApiResponse::error(400, "invalid_request", e.to_string()),
        };

        match serde_json::to_value(self.service.bias_check(&body.text)) {
            Ok(report) => ApiResponse::ok(report),
            Err(e) => ApiResponse::error(500, "serialization_failed", e.to_string()),
        }
    }

    /// Explicit question, or the configured default when absent
    fn question(&self, question: Option<&str>) -> Result<Question, ApiResponse> {
        let question = match question {
            Some(text) => Question::new(text).map_err(AnalysisError::from),
            None => self.service.default_question(),
        };
        question.map_err(ApiResponse::from)
    }
}
