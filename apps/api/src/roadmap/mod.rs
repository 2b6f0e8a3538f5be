//! Roadmap generation: profile, chosen path and gap analysis in, phased plan out.

use std::time::Duration;

use crate::cache::Fingerprint;
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, profile_block, JSON_ONLY_SYSTEM, RAW_JSON_INSTRUCTION};
use crate::llm_client::ProviderKind;
use crate::models::{CareerPathMinimal, CareerRoadmap, ResumeProfile, SkillGapAnalysis};
use crate::pipeline::{Job, Pipeline};

pub mod handlers;
pub mod parser;
pub mod phases;
pub mod prompts;

pub use phases::PhaseRange;

pub const MAX_TOKENS: u32 = 4000;
pub const CACHE_TTL: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Bounds accepted on incoming requests; generation itself allows 1-24.
pub const MIN_REQUEST_TIMELINE_MONTHS: u32 = 3;
pub const MAX_REQUEST_TIMELINE_MONTHS: u32 = 24;

/// Gaps listed in the prompt; the rest rarely change the plan.
const PROMPT_GAPS: usize = 8;

/// Everything one roadmap call needs.
#[derive(Debug, Clone, Copy)]
pub struct RoadmapInput<'a> {
    pub profile: &'a ResumeProfile,
    pub path: &'a CareerPathMinimal,
    pub analysis: &'a SkillGapAnalysis,
    pub timeline_months: u32,
}

fn gap_lines(analysis: &SkillGapAnalysis) -> String {
    if analysis.skill_gaps.is_empty() {
        return "- none identified".to_string();
    }
    analysis
        .skill_gaps
        .iter()
        .take(PROMPT_GAPS)
        .map(|gap| {
            format!(
                "- {} ({:?} -> {:?}, importance {})",
                gap.skill_name,
                gap.current_level,
                gap.required_level,
                gap.importance.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(input: &RoadmapInput<'_>, phase_count: usize) -> String {
    fill_template(
        prompts::ROADMAP_PROMPT_TEMPLATE,
        &[
            ("profile", profile_block(input.profile).as_str()),
            ("role_id", input.path.role_id.as_str()),
            ("role_name", input.path.role_name.as_str()),
            ("timeline", input.timeline_months.to_string().as_str()),
            ("severity", input.analysis.overall_gap_severity.as_str()),
            ("gaps", gap_lines(input.analysis).as_str()),
            ("phase_count", phase_count.to_string().as_str()),
            ("raw_json", RAW_JSON_INSTRUCTION),
        ],
    )
}

pub fn cache_key(input: &RoadmapInput<'_>, provider: ProviderKind) -> String {
    let gap_names: Vec<String> = input
        .analysis
        .skill_gaps
        .iter()
        .map(|g| g.skill_name.clone())
        .collect();
    Fingerprint::new(parser::TASK)
        .field("pathId", &input.path.role_id)
        .field("timeline", input.timeline_months)
        .field("severity", input.analysis.overall_gap_severity.as_str())
        .field("role", &input.profile.current_role)
        .field("years", input.profile.years_of_experience)
        .set("gaps", &gap_names)
        .field("provider", provider)
        .key()
}

pub async fn generate_roadmap(
    pipeline: &Pipeline,
    range: PhaseRange,
    input: RoadmapInput<'_>,
    provider: ProviderKind,
) -> Result<CareerRoadmap, AppError> {
    let phase_count = range.recommended(input.timeline_months, input.analysis.overall_gap_severity);
    let schema = prompts::roadmap_schema();
    let job = Job {
        task: parser::TASK,
        provider,
        system: JSON_ONLY_SYSTEM,
        prompt: build_prompt(&input, phase_count),
        max_tokens: MAX_TOKENS,
        schema: Some(&schema),
        cache_key: cache_key(&input, provider),
        ttl: CACHE_TTL,
    };
    let ctx = parser::RoadmapContext {
        career_path_id: &input.path.role_id,
        target_role: &input.path.role_name,
        timeline_months: input.timeline_months,
        max_phases: range.max,
        gaps: &input.analysis.skill_gaps,
    };
    pipeline
        .run(job, |raw| parser::parse_roadmap(raw, &ctx))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::router::tests::ScriptedProvider;
    use crate::models::career_path::tests::sample_path;
    use crate::models::profile::tests::sample_profile;
    use crate::models::skill_gap::tests::sample_analysis;
    use crate::models::Level;
    use crate::pipeline::tests::scripted_pipeline;
    use std::sync::Arc;

    const RANGE: PhaseRange = PhaseRange { min: 2, max: 5 };

    #[test]
    fn test_prompt_asks_for_policy_phase_count() {
        let profile = sample_profile();
        let path = sample_path().minimal();
        let mut analysis = sample_analysis();
        analysis.overall_gap_severity = Level::High;
        let input = RoadmapInput {
            profile: &profile,
            path: &path,
            analysis: &analysis,
            timeline_months: 6,
        };
        let count = RANGE.recommended(6, Level::High);
        let prompt = build_prompt(&input, count);
        assert!(prompt.contains("EXACTLY 3 phases"));
        assert!(prompt.contains("- System design (Beginner -> Advanced, importance High)"));
        assert!(!prompt.contains("{phase_count}"));
    }

    #[test]
    fn test_placeholders_inside_user_fields_are_not_expanded() {
        let mut profile = sample_profile();
        profile.current_role = "Engineer on {timeline} and {gaps}".to_string();
        let path = sample_path().minimal();
        let analysis = sample_analysis();
        let input = RoadmapInput {
            profile: &profile,
            path: &path,
            analysis: &analysis,
            timeline_months: 9,
        };
        let prompt = build_prompt(&input, 3);
        assert!(prompt.contains("Current role: Engineer on {timeline} and {gaps}"));
        assert!(prompt.contains("Create a 9-month transition roadmap"));
    }

    #[test]
    fn test_cache_key_ignores_gap_order_but_not_timeline() {
        let profile = sample_profile();
        let path = sample_path().minimal();
        let analysis = sample_analysis();
        let mut reordered = analysis.clone();
        reordered.skill_gaps.reverse();

        let input = |analysis, timeline_months| RoadmapInput {
            profile: &profile,
            path: &path,
            analysis,
            timeline_months,
        };
        let a = cache_key(&input(&analysis, 6), ProviderKind::Anthropic);
        assert_eq!(a, cache_key(&input(&reordered, 6), ProviderKind::Anthropic));
        assert_ne!(a, cache_key(&input(&analysis, 9), ProviderKind::Anthropic));
    }

    #[tokio::test]
    async fn test_high_severity_six_months_yields_policy_phases() {
        let phase = |n: u32| {
            format!(
                r#"{{"phaseNumber": {n}, "duration": "Months {a}-{b}", "skillsFocus": ["S{n}"],
                    "learningDirection": "D{n}", "projectIdeas": ["P{n}"], "milestones": ["M{n}"], "actionItems": ["A{n}"]}}"#,
                a = 2 * n - 1,
                b = 2 * n
            )
        };
        let reply = format!(
            r#"{{"careerPathId": "staff-frontend-engineer", "targetRole": "Staff Frontend Engineer",
                "timelineMonths": 6, "phases": [{}, {}, {}], "successMetrics": ["Lead a design review"],
                "riskFactors": ["Limited scope at current job"], "supportResources": ["Mentor"]}}"#,
            phase(1),
            phase(2),
            phase(3)
        );
        let provider = Arc::new(ScriptedProvider::new(ProviderKind::Anthropic, vec![reply.as_str()]));
        let pipeline = scripted_pipeline(provider.clone());

        let profile = sample_profile();
        let path = sample_path().minimal();
        let mut analysis = sample_analysis();
        analysis.overall_gap_severity = Level::High;
        let input = RoadmapInput {
            profile: &profile,
            path: &path,
            analysis: &analysis,
            timeline_months: 6,
        };

        let roadmap = generate_roadmap(&pipeline, RANGE, input, ProviderKind::Anthropic)
            .await
            .unwrap();
        assert_eq!(roadmap.phases.len(), 3);
        assert_eq!(roadmap.timeline_months, 6);
        assert!(provider.prompts.lock().unwrap()[0].contains("EXACTLY 3 phases"));
    }

    #[tokio::test]
    async fn test_degenerate_reply_gets_fallback() {
        let provider = Arc::new(ScriptedProvider::new(
            ProviderKind::Anthropic,
            vec![r#"{"phases": [{"note": "tbd"}]}"#],
        ));
        let pipeline = scripted_pipeline(provider);
        let profile = sample_profile();
        let path = sample_path().minimal();
        let analysis = sample_analysis();
        let input = RoadmapInput {
            profile: &profile,
            path: &path,
            analysis: &analysis,
            timeline_months: 12,
        };

        let roadmap = generate_roadmap(&pipeline, RANGE, input, ProviderKind::Anthropic)
            .await
            .unwrap();
        assert_eq!(roadmap.phases.len(), 2);
        assert_eq!(roadmap.phases[1].duration, "Months 7-12");
    }
}
