//! Line-delimited JSON serve loop
//!
//! Each input line is one [`ApiRequest`] with an optional `id`; each output
//! line is `{"id", "status", "body"}`. Requests are handled concurrently, so
//! responses come back in completion order and callers match them by `id`.
//! Two requests for the same analysis share one computation.

use super::router::{ApiRequest, ApiRouter};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Value,
    #[serde(flatten)]
    request: ApiRequest,
}

/// Serve requests from `input` until it closes, then drain in-flight ones
pub async fn serve<R, W>(router: Arc<ApiRouter>, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut in_flight: JoinSet<Value> = JoinSet::new();
    let mut open = true;
    info!("Serving line-delimited JSON requests");

    while open || !in_flight.is_empty() {
        tokio::select! {
            line = lines.next_line(), if open => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => match serde_json::from_str::<Envelope>(&line) {
                    Ok(Envelope { id, request }) => {
                        let router = Arc::clone(&router);
                        in_flight.spawn(async move {
                            let response = router.handle(&request).await;
                            json!({ "id": id, "status": response.status, "body": response.body })
                        });
                    }
                    Err(e) => {
                        debug!(error = %e, "Rejected malformed request line");
                        let reply = json!({
                            "id": Value::Null,
                            "status": 400,
                            "body": { "error": "invalid_request", "message": e.to_string() },
                        });
                        write_line(&mut output, &reply).await?;
                    }
                },
                None => open = false,
            },
            Some(joined) = in_flight.join_next() => {
                let reply = joined.unwrap_or_else(|e| {
                    warn!(error = %e, "Request handler failed");
                    json!({
                        "id": Value::Null,
                        "status": 500,
                        "body": { "error": "internal", "message": e.to_string() },
                    })
                });
                write_line(&mut output, &reply).await?;
            }
        }
    }

    output.flush().await
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, value: &Value) -> std::io::Result<()> {
    let mut line = value.to_string();
    line.push('\n');
    output.write_all(line.as_bytes()).await?;
    output.flush().await
}
