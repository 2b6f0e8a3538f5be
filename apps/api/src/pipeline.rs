//! Shared orchestration: cache check, provider call, recovery, cache store.
//!
//! Every generation task runs through [`Pipeline::run`]; only the prompt, the
//! token budget, the fingerprint and the parser differ between tasks.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::cache::ResponseCache;
use crate::errors::AppError;
use crate::llm_client::{CompletionRequest, ProviderKind, ProviderRouter};
use crate::recovery::RecoveryError;

/// One generation call, fully described.
pub struct Job<'a> {
    pub task: &'static str,
    pub provider: ProviderKind,
    pub system: &'a str,
    pub prompt: String,
    pub max_tokens: u32,
    pub schema: Option<&'a Value>,
    pub cache_key: String,
    pub ttl: Duration,
}

#[derive(Clone)]
pub struct Pipeline {
    router: Arc<ProviderRouter>,
    cache: Arc<ResponseCache>,
}

impl Pipeline {
    pub fn new(router: Arc<ProviderRouter>, cache: Arc<ResponseCache>) -> Self {
        Self { router, cache }
    }

    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Runs `job` and parses the raw reply with `parse`.
    ///
    /// Provider failures surface as `AppError::Provider`; parse and validation
    /// failures as `AppError::UnusableResponse`. Only validated results are cached.
    pub async fn run<T, F>(&self, job: Job<'_>, parse: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&str) -> Result<T, RecoveryError>,
    {
        let call_id = Uuid::new_v4();

        if let Some(hit) = self.cache.get_as::<T>(&job.cache_key).await {
            info!("[{call_id}] {} cache hit ({})", job.task, job.cache_key);
            return Ok(hit);
        }
        info!(
            "[{call_id}] {} cache miss, calling {} (max_tokens={})",
            job.task, job.provider, job.max_tokens
        );

        let started = Instant::now();
        let raw = self
            .router
            .call_ai(
                job.provider,
                CompletionRequest {
                    system: job.system,
                    prompt: &job.prompt,
                    max_tokens: job.max_tokens,
                    schema: job.schema,
                },
            )
            .await?;
        info!(
            "[{call_id}] {} provider replied in {:?} ({} chars)",
            job.task,
            started.elapsed(),
            raw.len()
        );

        let parsed = parse(&raw)?;
        self.cache.set_as(job.cache_key, &parsed, job.ttl).await;
        Ok(parsed)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm_client::router::tests::ScriptedProvider;
    use crate::llm_client::LlmProvider;

    /// Pipeline over a single scripted backend registered as the default provider.
    pub(crate) fn scripted_pipeline(provider: Arc<ScriptedProvider>) -> Pipeline {
        let kind = provider.kind();
        let router = ProviderRouter::new(kind).with_provider(provider);
        Pipeline::new(Arc::new(router), Arc::new(ResponseCache::new(true)))
    }

    fn job(key: &str) -> Job<'static> {
        Job {
            task: "test",
            provider: ProviderKind::Anthropic,
            system: "system",
            prompt: "prompt".to_string(),
            max_tokens: 100,
            schema: None,
            cache_key: key.to_string(),
            ttl: Duration::from_secs(60),
        }
    }

    fn parse_number(raw: &str) -> Result<u32, RecoveryError> {
        raw.trim().parse().map_err(|_| RecoveryError::Empty { task: "test" })
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let provider = Arc::new(ScriptedProvider::new(ProviderKind::Anthropic, vec!["7"]));
        let pipeline = scripted_pipeline(provider.clone());

        assert_eq!(pipeline.run(job("k"), parse_number).await.unwrap(), 7);
        assert_eq!(pipeline.run(job("k"), parse_number).await.unwrap(), 7);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_is_provider_error() {
        let provider = Arc::new(ScriptedProvider::failing(ProviderKind::Anthropic, "down"));
        let pipeline = scripted_pipeline(provider);

        let err = pipeline.run(job("k"), parse_number).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }

    #[tokio::test]
    async fn test_unusable_reply_is_not_cached() {
        let provider = Arc::new(ScriptedProvider::new(
            ProviderKind::Anthropic,
            vec!["garbage", "3"],
        ));
        let pipeline = scripted_pipeline(provider.clone());

        let err = pipeline.run(job("k"), parse_number).await.unwrap_err();
        assert!(matches!(err, AppError::UnusableResponse(_)));
        assert_eq!(pipeline.run(job("k"), parse_number).await.unwrap(), 3);
        assert_eq!(provider.calls(), 2);
    }
}
