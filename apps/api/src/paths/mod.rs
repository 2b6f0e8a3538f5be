//! Career-path generation: a cheap minimal list, the legacy full list, and
//! lazily fetched details for the one path the user picks.

use std::time::Duration;

use crate::cache::Fingerprint;
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, profile_block, JSON_ONLY_SYSTEM, LEVEL_VOCABULARY, RAW_JSON_INSTRUCTION};
use crate::llm_client::ProviderKind;
use crate::models::{CareerPath, CareerPathDetails, CareerPathMinimal, ResumeProfile};
use crate::pipeline::{Job, Pipeline};

pub mod handlers;
pub mod parser;
pub mod prompts;

pub const DEFAULT_PATH_COUNT: usize = 5;
pub const MAX_PATH_COUNT: usize = 8;

pub const MINIMAL_MAX_TOKENS: u32 = 1200;
pub const FULL_MAX_TOKENS: u32 = 3000;
pub const DETAILS_MAX_TOKENS: u32 = 1000;

pub const MINIMAL_TTL: Duration = Duration::from_secs(6 * 60 * 60);
pub const FULL_TTL: Duration = Duration::from_secs(6 * 60 * 60);
pub const DETAILS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Tech-stack entries that feed the path fingerprint; later entries rarely change the answer.
const FINGERPRINT_TECH_ENTRIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Minimal,
    Full,
}

impl Variant {
    fn as_str(&self) -> &'static str {
        match self {
            Variant::Minimal => "minimal",
            Variant::Full => "full",
        }
    }
}

pub fn paths_cache_key(
    profile: &ResumeProfile,
    count: usize,
    variant: Variant,
    provider: ProviderKind,
) -> String {
    let task = match variant {
        Variant::Minimal => parser::TASK_MINIMAL,
        Variant::Full => parser::TASK_FULL,
    };
    Fingerprint::new(task)
        .field("count", count)
        .field("role", &profile.current_role)
        .field("years", profile.years_of_experience)
        .prefix("tech", &profile.tech_stack, FINGERPRINT_TECH_ENTRIES)
        .field("variant", variant.as_str())
        .field("provider", provider)
        .key()
}

pub fn details_cache_key(
    profile: &ResumeProfile,
    role_id: &str,
    role_name: &str,
    provider: ProviderKind,
) -> String {
    Fingerprint::new(parser::TASK_DETAILS)
        .field("roleId", role_id)
        .field("roleName", role_name)
        .field("role", &profile.current_role)
        .field("years", profile.years_of_experience)
        .field("provider", provider)
        .key()
}

pub fn build_paths_prompt(profile: &ResumeProfile, count: usize, variant: Variant) -> String {
    let template = match variant {
        Variant::Minimal => prompts::MINIMAL_PROMPT_TEMPLATE,
        Variant::Full => prompts::FULL_PROMPT_TEMPLATE,
    };
    fill_template(
        template,
        &[
            ("count", count.to_string().as_str()),
            ("profile", profile_block(profile).as_str()),
            ("levels", LEVEL_VOCABULARY),
            ("raw_json", RAW_JSON_INSTRUCTION),
        ],
    )
}

pub fn build_details_prompt(profile: &ResumeProfile, role_id: &str, role_name: &str) -> String {
    fill_template(
        prompts::DETAILS_PROMPT_TEMPLATE,
        &[
            ("profile", profile_block(profile).as_str()),
            ("role_id", role_id),
            ("role_name", role_name),
            ("levels", LEVEL_VOCABULARY),
            ("raw_json", RAW_JSON_INSTRUCTION),
        ],
    )
}

pub async fn generate_paths_minimal(
    pipeline: &Pipeline,
    profile: &ResumeProfile,
    count: usize,
    provider: ProviderKind,
) -> Result<Vec<CareerPathMinimal>, AppError> {
    let job = Job {
        task: parser::TASK_MINIMAL,
        provider,
        system: JSON_ONLY_SYSTEM,
        prompt: build_paths_prompt(profile, count, Variant::Minimal),
        max_tokens: MINIMAL_MAX_TOKENS,
        schema: None,
        cache_key: paths_cache_key(profile, count, Variant::Minimal, provider),
        ttl: MINIMAL_TTL,
    };
    pipeline
        .run(job, |raw| parser::parse_minimal(raw, count))
        .await
}

pub async fn generate_paths_full(
    pipeline: &Pipeline,
    profile: &ResumeProfile,
    count: usize,
    provider: ProviderKind,
) -> Result<Vec<CareerPath>, AppError> {
    let schema = prompts::full_schema();
    let job = Job {
        task: parser::TASK_FULL,
        provider,
        system: JSON_ONLY_SYSTEM,
        prompt: build_paths_prompt(profile, count, Variant::Full),
        max_tokens: FULL_MAX_TOKENS,
        schema: Some(&schema),
        cache_key: paths_cache_key(profile, count, Variant::Full, provider),
        ttl: FULL_TTL,
    };
    pipeline.run(job, |raw| parser::parse_full(raw, count)).await
}

pub async fn get_path_details(
    pipeline: &Pipeline,
    profile: &ResumeProfile,
    role_id: &str,
    role_name: &str,
    provider: ProviderKind,
) -> Result<CareerPathDetails, AppError> {
    let schema = prompts::details_schema();
    let job = Job {
        task: parser::TASK_DETAILS,
        provider,
        system: JSON_ONLY_SYSTEM,
        prompt: build_details_prompt(profile, role_id, role_name),
        max_tokens: DETAILS_MAX_TOKENS,
        schema: Some(&schema),
        cache_key: details_cache_key(profile, role_id, role_name, provider),
        ttl: DETAILS_TTL,
    };
    pipeline
        .run(job, |raw| parser::parse_details(raw, role_id, role_name))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::router::tests::ScriptedProvider;
    use crate::models::profile::tests::sample_profile;
    use crate::pipeline::tests::scripted_pipeline;
    use std::sync::Arc;

    #[test]
    fn test_fingerprint_ignores_fourth_tech_entry() {
        let mut profile = sample_profile();
        let a = paths_cache_key(&profile, 5, Variant::Minimal, ProviderKind::Anthropic);
        profile.tech_stack[3] = "Kubernetes".to_string();
        profile.strength_areas.push("Public speaking".to_string());
        let b = paths_cache_key(&profile, 5, Variant::Minimal, ProviderKind::Anthropic);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_tracks_relevant_fields() {
        let profile = sample_profile();
        let base = paths_cache_key(&profile, 5, Variant::Minimal, ProviderKind::Anthropic);
        assert_ne!(base, paths_cache_key(&profile, 3, Variant::Minimal, ProviderKind::Anthropic));
        assert_ne!(base, paths_cache_key(&profile, 5, Variant::Full, ProviderKind::Anthropic));
        assert_ne!(base, paths_cache_key(&profile, 5, Variant::Minimal, ProviderKind::OpenAi));

        let mut senior = profile.clone();
        senior.years_of_experience = 8.0;
        assert_ne!(base, paths_cache_key(&senior, 5, Variant::Minimal, ProviderKind::Anthropic));
    }

    #[test]
    fn test_prompts_have_no_leftover_placeholders() {
        let profile = sample_profile();
        for prompt in [
            build_paths_prompt(&profile, 4, Variant::Minimal),
            build_paths_prompt(&profile, 4, Variant::Full),
            build_details_prompt(&profile, "staff-engineer", "Staff Engineer"),
        ] {
            for placeholder in ["{count}", "{profile}", "{levels}", "{raw_json}", "{role_id}"] {
                assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
            }
        }
        assert!(build_paths_prompt(&profile, 4, Variant::Full).contains("never \"Very High\""));
    }

    #[tokio::test]
    async fn test_minimal_paths_cached_per_fingerprint() {
        let reply = r#"{"p":[{"id":"staff-engineer","n":"Staff Engineer","d":"Lead.","md":88,"ia":92,"s":["Design"]}]}"#;
        let provider = Arc::new(ScriptedProvider::new(ProviderKind::Anthropic, vec![reply]));
        let pipeline = scripted_pipeline(provider.clone());
        let mut profile = sample_profile();

        let first = generate_paths_minimal(&pipeline, &profile, 5, ProviderKind::Anthropic)
            .await
            .unwrap();
        profile.tech_stack.push("Terraform".to_string());
        let second = generate_paths_minimal(&pipeline, &profile, 5, ProviderKind::Anthropic)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_details_from_provider() {
        let reply = r#"{"roleId":"staff-engineer","roleName":"Staff Engineer","effortLevel":"Medium",
            "rewardPotential":"Very High","reasoning":"Natural next step."}"#;
        let provider = Arc::new(ScriptedProvider::new(ProviderKind::Anthropic, vec![reply]));
        let pipeline = scripted_pipeline(provider);

        let details = get_path_details(
            &pipeline,
            &sample_profile(),
            "staff-engineer",
            "Staff Engineer",
            ProviderKind::Anthropic,
        )
        .await
        .unwrap();
        assert_eq!(details.reward_potential, crate::models::Level::High);
    }
}
