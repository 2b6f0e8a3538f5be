//! Resume interpretation: free text in, `ResumeProfile` out.

use std::time::Duration;

use crate::cache::Fingerprint;
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, RAW_JSON_INSTRUCTION};
use crate::llm_client::ProviderKind;
use crate::models::ResumeProfile;
use crate::pipeline::{Job, Pipeline};

pub mod document;
pub mod handlers;
pub mod parser;
pub mod prompts;

pub const MAX_TOKENS: u32 = 1500;
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);
pub const MAX_RESUME_CHARS: usize = 30_000;

pub fn build_prompt(resume_text: &str) -> String {
    fill_template(
        prompts::INTERPRET_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text.trim()),
            ("raw_json", RAW_JSON_INSTRUCTION),
        ],
    )
}

/// Keyed on the whitespace- and case-normalized resume text.
pub fn cache_key(resume_text: &str, provider: ProviderKind) -> String {
    Fingerprint::new(parser::TASK)
        .field("resume", resume_text)
        .field("provider", provider)
        .key()
}

pub async fn interpret_resume(
    pipeline: &Pipeline,
    resume_text: &str,
    provider: ProviderKind,
) -> Result<ResumeProfile, AppError> {
    let job = Job {
        task: parser::TASK,
        provider,
        system: prompts::INTERPRET_SYSTEM,
        prompt: build_prompt(resume_text),
        max_tokens: MAX_TOKENS,
        schema: None,
        cache_key: cache_key(resume_text, provider),
        ttl: CACHE_TTL,
    };
    pipeline.run(job, parser::parse_profile).await
}
