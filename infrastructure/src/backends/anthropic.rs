//! Anthropic Messages API backend

use super::{check_status, http_client, send_error};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use council_application::{BackendError, JudgmentBackend};
use serde_json::{Value, json};
use std::time::Instant;
use tracing::debug;

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicBackend {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

// Keeps the key out of debug output.
impl std::fmt::Debug for AnthropicBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicBackend")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicBackend {
    /// Reads the API key from the environment variable named by `api_key_env`
    pub fn new(config: &FileProviderConfig) -> Result<Self, BackendError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                BackendError::MissingCredentials(format!(
                    "Anthropic API key not found. Set {}",
                    config.api_key_env
                ))
            })?;

        Self::with_key(api_key, config)
    }

    fn with_key(api_key: String, config: &FileProviderConfig) -> Result<Self, BackendError> {
        Ok(Self {
            api_key,
            base_url: config.base_url().to_string(),
            model: config.model().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: http_client(config.request_timeout())?,
        })
    }

    fn request_body(&self, system_prompt: &str, user_prompt: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": system_prompt,
            "messages": [{
                "role": "user",
                "content": user_prompt
            }]
        })
    }
}

/// Concatenate the text blocks of a Messages API response
fn extract_text(body: &Value) -> Result<String, BackendError> {
    let text: String = body["content"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .collect();

    if text.is_empty() {
        return Err(BackendError::InvalidResponse(
            "no text content in message".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl JudgmentBackend for AnthropicBackend {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, BackendError> {
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&self.request_body(system_prompt, user_prompt))
            .send()
            .await
            .map_err(send_error)?;
        let response = check_status(response).await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        debug!(
            model = %self.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Anthropic completion finished"
        );

        extract_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_server::serve_once;
    use crate::config::ProviderKind;

    fn backend(base_url: &str) -> AnthropicBackend {
        let config = FileProviderConfig {
            kind: ProviderKind::Anthropic,
            base_url: Some(base_url.to_string()),
            ..Default::default()
        };
        AnthropicBackend::with_key("sk-test".to_string(), &config).unwrap()
    }

    #[test]
    fn test_extract_text_joins_text_blocks() {
        let body = json!({
            "content": [
                {"type": "text", "text": "{\"vote\": "},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "\"NO\"}"}
            ]
        });
        assert_eq!(extract_text(&body).unwrap(), r#"{"vote": "NO"}"#);
        assert!(extract_text(&json!({"content": []})).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", backend("http://localhost"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-test"));
    }

    #[tokio::test]
    async fn test_complete_sends_headers_and_system_prompt() {
        let (url, request) = serve_once(
            200,
            r#"{"content":[{"type":"text","text":"{\"vote\":\"YES\",\"confidence\":0.9}"}]}"#,
        )
        .await;

        let reply = backend(&url).complete("You are Lex", "QUESTION").await.unwrap();
        assert_eq!(reply, r#"{"vote":"YES","confidence":0.9}"#);

        let request = request.await.unwrap();
        let lower = request.to_lowercase();
        assert!(request.starts_with("POST /v1/messages"));
        assert!(lower.contains("x-api-key: sk-test"));
        assert!(lower.contains("anthropic-version: 2023-06-01"));

        let body: Value = serde_json::from_str(request.split("\r\n\r\n").nth(1).unwrap()).unwrap();
        assert_eq!(body["system"], "You are Lex");
        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["messages"][0]["content"], "QUESTION");
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let (url, _request) = serve_once(401, r#"{"type":"error"}"#).await;

        let error = backend(&url).complete("s", "u").await.unwrap_err();
        assert!(matches!(error, BackendError::RequestFailed { status: 401, .. }));
    }
}
