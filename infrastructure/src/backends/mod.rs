//! Judgment backend adapters
//!
//! Implementations of the [`JudgmentBackend`] port:
//! - [`LocalBackend`]: OpenAI-compatible `/chat/completions` (LM Studio, Ollama)
//! - [`AnthropicBackend`]: Anthropic Messages API
//! - [`ScriptedBackend`]: deterministic canned replies for demos and offline runs

mod anthropic;
mod local;
mod scripted;

pub use anthropic::AnthropicBackend;
pub use local::LocalBackend;
pub use scripted::ScriptedBackend;

use crate::config::{FileProviderConfig, ProviderKind};
use council_application::{BackendError, JudgmentBackend};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Build the backend selected by `[provider] kind`
pub fn build_backend(config: &FileProviderConfig) -> Result<Arc<dyn JudgmentBackend>, BackendError> {
    let backend: Arc<dyn JudgmentBackend> = match config.kind {
        ProviderKind::Local => Arc::new(LocalBackend::new(config)?),
        ProviderKind::Anthropic => Arc::new(AnthropicBackend::new(config)?),
        ProviderKind::Mock => Arc::new(ScriptedBackend::new()),
    };
    info!(
        backend = backend.name(),
        model = config.model(),
        "Judgment backend ready"
    );
    Ok(backend)
}

fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, BackendError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| BackendError::Other(format!("Failed to create HTTP client: {}", e)))
}

fn send_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout
    } else if error.is_connect() {
        BackendError::ConnectionError(error.to_string())
    } else {
        BackendError::Other(error.to_string())
    }
}

/// Turn a non-success response into `RequestFailed` carrying the body
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(BackendError::RequestFailed {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP responder for exercising the reqwest adapters.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one request with `status` and a JSON `body`.
    ///
    /// Returns the base URL and a handle yielding the raw request text.
    pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..split]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= split + 4 + content_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mock_backend() {
        let config = FileProviderConfig {
            kind: ProviderKind::Mock,
            ..Default::default()
        };
        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.name(), "mock");
    }

    #[test]
    fn test_build_local_backend() {
        let backend = build_backend(&FileProviderConfig::default()).unwrap();
        assert_eq!(backend.name(), "local");
    }

    #[test]
    fn test_anthropic_without_key_fails() {
        let config = FileProviderConfig {
            kind: ProviderKind::Anthropic,
            api_key_env: "COUNCIL_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            build_backend(&config),
            Err(BackendError::MissingCredentials(_))
        ));
    }
}
