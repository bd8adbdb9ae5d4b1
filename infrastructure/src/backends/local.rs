//! OpenAI-compatible chat completions backend (LM Studio, Ollama, vLLM)

use super::{check_status, http_client, send_error};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use council_application::{BackendError, JudgmentBackend};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

pub struct LocalBackend {
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl LocalBackend {
    pub fn new(config: &FileProviderConfig) -> Result<Self, BackendError> {
        Ok(Self {
            base_url: config.base_url().to_string(),
            model: config.model().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: http_client(config.request_timeout())?,
        })
    }

    fn build_request<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl JudgmentBackend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, BackendError> {
        let start = Instant::now();
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(system_prompt, user_prompt))
            .send()
            .await
            .map_err(send_error)?;
        let response = check_status(response).await?;

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        debug!(
            model = %self.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Local completion finished"
        );

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::InvalidResponse("no content in completion".to_string()))
    }
}
