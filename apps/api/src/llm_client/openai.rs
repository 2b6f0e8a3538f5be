//! OpenAI Chat Completions backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{
    http_client, send_with_retry, vendor_error_message, CompletionRequest, LlmError, LlmProvider,
    ProviderKind, TEMPERATURE,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatCompletionResponse {
    fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Maps an optional schema onto OpenAI's structured-output switch.
fn response_format(schema: Option<&Value>) -> Option<Value> {
    schema.map(|schema| {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": "careerpilot_output",
                "schema": schema,
                "strict": false
            }
        })
    })
}

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    max_retries: u32,
}

impl OpenAiProvider {
    pub fn new(
        api_key: Option<String>,
        timeout_secs: u64,
        max_retries: u32,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            api_key,
            max_retries,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn send(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingCredentials(ProviderKind::OpenAi))?;

        let body = ChatCompletionRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            max_tokens: request.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            response_format: response_format(request.schema),
        };

        let response = send_with_retry(
            ProviderKind::OpenAi,
            self.max_retries,
            || {
                self.client
                    .post(OPENAI_API_URL)
                    .bearer_auth(api_key)
                    .json(&body)
                    .send()
            },
            vendor_error_message,
        )
        .await?;

        let parsed: ChatCompletionResponse = serde_json::from_slice(&response.bytes().await?)?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "OpenAI call succeeded: prompt_tokens={}, completion_tokens={}, finish_reason={:?}",
                usage.prompt_tokens,
                usage.completion_tokens,
                parsed.choices.first().and_then(|c| c.finish_reason.as_deref())
            );
        }

        parsed
            .text()
            .map(String::from)
            .ok_or(LlmError::EmptyContent)
    }
}
