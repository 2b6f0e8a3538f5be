//! LLM Client: the single point of entry for all vendor calls in CareerPilot.
//!
//! ARCHITECTURAL RULE: No other module may call a vendor API directly.
//! Orchestrators talk to `router::ProviderRouter`, which talks to an `LlmProvider`.
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub mod anthropic;
pub mod openai;
pub mod prompts;
pub mod router;

pub use router::{ProviderKind, ProviderRouter};

/// Sampling temperature used for every call. Low so repeated calls stay close.
pub const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Gave up after {retries} attempts")]
    RetriesExhausted { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Missing credentials for provider '{0}'")]
    MissingCredentials(ProviderKind),
}

/// One provider-agnostic completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    /// Optional JSON schema for vendors that support structured output.
    pub schema: Option<&'a Value>,
}

/// The capability every vendor backend exposes: send a prompt, get raw text back.
///
/// Carried in `ProviderRouter` as `Arc<dyn LlmProvider>`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn send(&self, request: CompletionRequest<'_>) -> Result<String, LlmError>;
}

/// Builds the shared HTTP client used by vendor backends.
pub(crate) fn http_client(timeout_secs: u64) -> Result<Client, LlmError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Sends a request, retrying up to `max_retries` times on 429, 5xx and transport failures with exponential backoff.
/// Other non-2xx statuses fail immediately with the message extracted by `error_message`.
pub(crate) async fn send_with_retry<F, Fut>(
    vendor: ProviderKind,
    max_retries: u32,
    mut send: F,
    error_message: fn(&str) -> Option<String>,
) -> Result<Response, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let attempts = max_retries + 1;
    let mut last_error: Option<LlmError> = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            // Exponential backoff: 1s, 2s, 4s
            let delay = Duration::from_millis(1000 * (1 << (attempt - 1).min(5)));
            warn!(
                "{vendor} call attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(LlmError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("{vendor} API returned {}: {}", status, body);
            last_error = Some(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        return Ok(response);
    }

    Err(last_error.unwrap_or(LlmError::RetriesExhausted { retries: attempts }))
}

/// Pulls `error.message` out of a vendor error body; both vendors use this shape.
pub(crate) fn vendor_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")?
        .get("message")?
        .as_str()
        .map(String::from)
}
