//! Provider Router: picks one of the two interchangeable backends per request.
//!
//! Resolution order: explicit request field > session preference header > process default.
//! Unknown identifiers fail fast; there is never a silent fallback.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::{CompletionRequest, LlmError, LlmProvider};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown AI provider '{0}'. Expected one of: anthropic, openai")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" | "gpt" => Ok(ProviderKind::OpenAi),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// Routes completion requests to a registered backend.
#[derive(Clone)]
pub struct ProviderRouter {
    providers: HashMap<ProviderKind, Arc<dyn LlmProvider>>,
    default: ProviderKind,
}

impl ProviderRouter {
    pub fn new(default: ProviderKind) -> Self {
        Self {
            providers: HashMap::new(),
            default,
        }
    }

    /// Registers a backend under its own `kind()`, replacing any previous one.
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    pub fn default_provider(&self) -> ProviderKind {
        self.default
    }

    /// Resolves the provider for one request. Blank values count as absent.
    pub fn resolve(
        &self,
        explicit: Option<&str>,
        preference: Option<&str>,
    ) -> Result<ProviderKind, UnknownProvider> {
        let chosen = [explicit, preference]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty());

        match chosen {
            Some(raw) => raw.parse(),
            None => Ok(self.default),
        }
    }

    /// `callAI`: one outbound call to the selected vendor.
    pub async fn call_ai(
        &self,
        kind: ProviderKind,
        request: CompletionRequest<'_>,
    ) -> Result<String, LlmError> {
        let provider = self
            .providers
            .get(&kind)
            .ok_or(LlmError::MissingCredentials(kind))?;

        info!(
            "Calling provider {kind} (max_tokens={}, structured={})",
            request.max_tokens,
            request.schema.is_some()
        );
        provider.send(request).await
    }
}
