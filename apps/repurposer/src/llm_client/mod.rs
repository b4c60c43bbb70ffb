//! Anthropic Messages API client behind the `TextModel` seam.
//!
//! Nothing outside this module talks HTTP. Agents and the pipeline take a
//! `&dyn TextModel`, so tests can swap in a scripted model.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.7;
pub const MAX_ATTEMPTS: u32 = 3;
/// Linear backoff: attempt N waits N × this before retrying.
const RETRY_BASE_DELAY_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Text-in/text-out model seam. Implementations own their retry policy.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    retry_base_delay: Duration,
}

/// What one HTTP attempt tells the retry loop to do next.
enum Attempt<T> {
    Done(T),
    Retry(LlmError),
    Fail(LlmError),
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Self::with_endpoint(api_key, ANTHROPIC_API_URL)
    }

    /// Same client pointed at another Messages-compatible URL.
    pub fn with_endpoint(api_key: String, endpoint: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
            api_key,
            endpoint: endpoint.into(),
            retry_base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
        })
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    /// Retries transport errors, 429 and 5xx with linearly increasing delay;
    /// other 4xx responses fail immediately.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let llm_response = with_retries(MAX_ATTEMPTS, self.retry_base_delay, || {
            self.attempt(&request_body)
        })
        .await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );
        Ok(llm_response)
    }

    async fn attempt(&self, request_body: &AnthropicRequest<'_>) -> Attempt<LlmResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request_body)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => return Attempt::Retry(LlmError::Http(e)),
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            return Attempt::Retry(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Attempt::Fail(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        match response.json::<LlmResponse>().await {
            Ok(r) => Attempt::Done(r),
            Err(e) => Attempt::Fail(LlmError::Http(e)),
        }
    }
}

/// Runs `op` up to `attempts` times. Attempt N (from 1) waits N × `base_delay`
/// before the next try. Exhausting the budget returns the last retryable error.
async fn with_retries<T, F, Fut>(attempts: u32, base_delay: Duration, mut op: F) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let mut last_error: Option<LlmError> = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            let delay = base_delay * attempt;
            warn!(
                "LLM call attempt {}/{} failed, retrying after {}ms...",
                attempt,
                attempts,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        match op().await {
            Attempt::Done(value) => return Ok(value),
            Attempt::Fail(e) => return Err(e),
            Attempt::Retry(e) => last_error = Some(e),
        }
    }

    Err(last_error.unwrap_or(LlmError::RateLimited { retries: attempts }))
}

#[async_trait]
impl TextModel for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        let text = strip_code_fences(text);
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text.to_string())
    }
}

/// Strips a ```lang ... ``` wrapper the model sometimes puts around plain content.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // An opening fence line without spaces is a language tag, not content.
    let rest = match rest.find('\n') {
        Some(i) if !rest[..i].contains(' ') => &rest[i + 1..],
        _ => rest,
    };
    rest.strip_suffix("```")
        .map(str::trim)
        .unwrap_or(rest.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const OK_BODY: &str = r#"{"content":[{"type":"text","text":"Hello"}],"usage":{"input_tokens":3,"output_tokens":1}}"#;
    const BAD_REQUEST_BODY: &str =
        r#"{"type":"error","error":{"type":"invalid_request_error","message":"max_tokens: too large"}}"#;

    /// Serves one canned `(status, body)` per connection, in order, and counts requests.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1/messages", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                read_request(&mut socket).await;
                counter.fetch_add(1, Ordering::SeqCst);
                let reply = format!(
                    "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (url, hits)
    }

    /// Reads headers plus `content-length` bytes of body.
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    fn fast_client(url: String) -> LlmClient {
        let mut client = LlmClient::with_endpoint("sk-test".to_string(), url).unwrap();
        client.retry_base_delay = Duration::from_millis(10);
        client
    }

    #[tokio::test]
    async fn test_server_errors_retried_until_success() {
        let (url, hits) = serve(vec![(503, "overloaded"), (503, "overloaded"), (200, OK_BODY)]).await;
        let client = fast_client(url);

        let started = std::time::Instant::now();
        let text = client.complete("sys", "hi").await.unwrap();

        assert_eq!(text, "Hello");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        // 10ms then 20ms between attempts
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_client_error_fails_fast_with_api_message() {
        let (url, hits) = serve(vec![(400, BAD_REQUEST_BODY), (200, OK_BODY)]).await;
        let client = fast_client(url);

        let err = client.call("hi", "sys").await.unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "max_tokens: too large");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_last_server_error() {
        let (url, hits) = serve(vec![(500, "boom"), (429, "slow down"), (502, "bad gateway")]).await;
        let client = fast_client(url);

        let err = client.call("hi", "sys").await.unwrap_err();

        assert!(
            matches!(&err, LlmError::Api { status: 502, message } if message == "bad gateway"),
            "{err:?}"
        );
        assert_eq!(hits.load(Ordering::SeqCst), MAX_ATTEMPTS as usize);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_grows_linearly() {
        let start = tokio::time::Instant::now();
        let mut seen = Vec::new();

        let result: Result<(), LlmError> = with_retries(3, Duration::from_secs(1), || {
            seen.push(start.elapsed());
            async {
                Attempt::Retry(LlmError::Api {
                    status: 503,
                    message: "busy".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
        assert_eq!(
            seen,
            vec![Duration::ZERO, Duration::from_secs(1), Duration::from_secs(3)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fail_stops_retrying() {
        let mut calls = 0;
        let result: Result<(), LlmError> = with_retries(3, Duration::from_secs(1), || {
            calls += 1;
            async { Attempt::Fail(LlmError::EmptyContent) }
        })
        .await;

        assert!(matches!(result, Err(LlmError::EmptyContent)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_strip_code_fences_with_language_tag() {
        let input = "```markdown\nExcited to share our launch!\n```";
        assert_eq!(strip_code_fences(input), "Excited to share our launch!");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\nLine one\nLine two\n```";
        assert_eq!(strip_code_fences(input), "Line one\nLine two");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "  Plain post text.  ";
        assert_eq!(strip_code_fences(input), "Plain post text.");
    }

    #[test]
    fn test_strip_code_fences_single_line() {
        assert_eq!(strip_code_fences("```Hello world```"), "Hello world");
    }

    #[test]
    fn test_response_text_picks_first_text_block() {
        let json = r#"{
            "content": [
                {"type": "tool_use"},
                {"type": "text", "text": "Hello"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 2}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("Hello"));
    }

    #[test]
    fn test_request_serializes_temperature_and_system() {
        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: "sys",
            messages: vec![AnthropicMessage {
                role: "user",
                content: "hi",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["system"], "sys");
        assert_eq!(value["messages"][0]["role"], "user");
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }
}
