//! Skill-gap analysis of a profile against one chosen career path.

use std::time::Duration;

use crate::cache::Fingerprint;
use crate::errors::AppError;
use crate::llm_client::prompts::{
    fill_template, join_or_none, profile_block, JSON_ONLY_SYSTEM, LEVEL_VOCABULARY, PROFICIENCY_VOCABULARY,
    RAW_JSON_INSTRUCTION,
};
use crate::llm_client::ProviderKind;
use crate::models::{CareerPathMinimal, ResumeProfile, SkillGapAnalysis};
use crate::pipeline::{Job, Pipeline};

pub mod handlers;
pub mod parser;
pub mod prompts;

pub const MAX_TOKENS: u32 = 2500;
pub const CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

pub fn build_prompt(profile: &ResumeProfile, path: &CareerPathMinimal) -> String {
    fill_template(
        prompts::SKILL_GAP_PROMPT_TEMPLATE,
        &[
            ("profile", profile_block(profile).as_str()),
            ("role_id", path.role_id.as_str()),
            ("role_name", path.role_name.as_str()),
            ("description", path.description.as_str()),
            ("required_skills", join_or_none(&path.required_skills).as_str()),
            ("proficiency", PROFICIENCY_VOCABULARY),
            ("levels", LEVEL_VOCABULARY),
            ("raw_json", RAW_JSON_INSTRUCTION),
        ],
    )
}

pub fn cache_key(profile: &ResumeProfile, path: &CareerPathMinimal, provider: ProviderKind) -> String {
    Fingerprint::new(parser::TASK)
        .field("pathId", &path.role_id)
        .field("pathName", &path.role_name)
        .field("role", &profile.current_role)
        .field("years", profile.years_of_experience)
        .set("tech", &profile.tech_stack)
        .set("requiredSkills", &path.required_skills)
        .field("provider", provider)
        .key()
}

pub async fn analyze_skill_gaps(
    pipeline: &Pipeline,
    profile: &ResumeProfile,
    path: &CareerPathMinimal,
    provider: ProviderKind,
) -> Result<SkillGapAnalysis, AppError> {
    let schema = prompts::skill_gap_schema();
    let job = Job {
        task: parser::TASK,
        provider,
        system: JSON_ONLY_SYSTEM,
        prompt: build_prompt(profile, path),
        max_tokens: MAX_TOKENS,
        schema: Some(&schema),
        cache_key: cache_key(profile, path, provider),
        ttl: CACHE_TTL,
    };
    pipeline
        .run(job, |raw| parser::parse_analysis(raw, profile, path))
        .await
}
