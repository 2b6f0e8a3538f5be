//! Anthropic Messages API backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    http_client, send_with_retry, vendor_error_message, CompletionRequest, LlmError, LlmProvider,
    ProviderKind, TEMPERATURE,
};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";

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
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    /// Concatenates every text block in order.
    fn text(&self) -> Option<String> {
        let text: String = self
            .content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Clone)]
pub struct AnthropicProvider {
    client: Client,
    api_key: Option<String>,
    max_retries: u32,
}

impl AnthropicProvider {
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

/// Anthropic has no response_format switch; the schema rides along in the system prompt.
fn system_with_schema(system: &str, schema: Option<&serde_json::Value>) -> String {
    match schema {
        Some(schema) => format!(
            "{system}\n\nThe JSON you return MUST conform to this JSON Schema:\n{schema}"
        ),
        None => system.to_string(),
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn send(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingCredentials(ProviderKind::Anthropic))?;

        let system = system_with_schema(request.system, request.schema);
        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: request.max_tokens,
            temperature: TEMPERATURE,
            system: &system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
        };

        let response = send_with_retry(
            ProviderKind::Anthropic,
            self.max_retries,
            || {
                self.client
                    .post(ANTHROPIC_API_URL)
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .header("content-type", "application/json")
                    .json(&body)
                    .send()
            },
            vendor_error_message,
        )
        .await?;

        let parsed: AnthropicResponse = serde_json::from_slice(&response.bytes().await?)?;

        debug!(
            "Anthropic call succeeded: input_tokens={}, output_tokens={}, stop_reason={:?}",
            parsed.usage.input_tokens, parsed.usage.output_tokens, parsed.stop_reason
        );

        parsed.text().ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_joins_text_blocks_and_skips_others() {
        let json = r#"{
            "content": [
                {"type": "text", "text": "{\"a\":"},
                {"type": "tool_use"},
                {"type": "text", "text": "1}"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 4},
            "stop_reason": "end_turn"
        }"#;
        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_text_none_when_blank() {
        let json = r#"{"content": [{"type": "text", "text": "  "}], "usage": {"input_tokens": 1, "output_tokens": 0}, "stop_reason": null}"#;
        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_system_with_schema_appends_schema() {
        let schema = serde_json::json!({"type": "object"});
        let system = system_with_schema("Be precise.", Some(&schema));
        assert!(system.starts_with("Be precise."));
        assert!(system.contains(r#"{"type":"object"}"#));
        assert_eq!(system_with_schema("Be precise.", None), "Be precise.");
    }

    #[tokio::test]
    async fn test_send_without_key_is_missing_credentials() {
        let provider = AnthropicProvider::new(None, 5, 1).unwrap();
        let err = provider
            .send(CompletionRequest {
                system: "s",
                prompt: "p",
                max_tokens: 10,
                schema: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LlmError::MissingCredentials(ProviderKind::Anthropic)
        ));
    }
}
