//! Axum route handler for roadmap generation.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::mock;
use crate::models::{
    within, CareerPathMinimal, CareerRoadmap, ResumeProfile, SkillGapAnalysis, Validate,
};
use crate::response::ApiResponse;
use crate::routes::validated::ValidatedJson;
use crate::routes::{resolve_provider, GenerationQuery};
use crate::state::AppState;

use super::{
    generate_roadmap, PhaseRange, RoadmapInput, MAX_REQUEST_TIMELINE_MONTHS,
    MIN_REQUEST_TIMELINE_MONTHS,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapRequest {
    pub profile: ResumeProfile,
    pub career_path: CareerPathMinimal,
    pub skill_gap_analysis: SkillGapAnalysis,
    pub timeline_months: u32,
    #[serde(default)]
    pub provider: Option<String>,
}

impl RoadmapRequest {
    fn input(&self) -> RoadmapInput<'_> {
        RoadmapInput {
            profile: &self.profile,
            path: &self.career_path,
            analysis: &self.skill_gap_analysis,
            timeline_months: self.timeline_months,
        }
    }
}

impl Validate for RoadmapRequest {
    fn validate(&self) -> Result<(), String> {
        within("profile", self.profile.validate())?;
        within("careerPath", self.career_path.validate())?;
        within("skillGapAnalysis", self.skill_gap_analysis.validate())?;
        if !(MIN_REQUEST_TIMELINE_MONTHS..=MAX_REQUEST_TIMELINE_MONTHS)
            .contains(&self.timeline_months)
        {
            return Err(format!(
                "timelineMonths must be between {MIN_REQUEST_TIMELINE_MONTHS} and {MAX_REQUEST_TIMELINE_MONTHS}"
            ));
        }
        Ok(())
    }
}

/// POST /api/roadmap
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<RoadmapRequest>,
) -> Result<Json<ApiResponse<CareerRoadmap>>, AppError> {
    let range = PhaseRange::from_config(&state.config);
    if query.is_mock() {
        return Ok(ApiResponse::ok(mock::roadmap(range, &request.input())));
    }

    let provider = resolve_provider(&state, request.provider.as_deref(), &headers)?;
    let roadmap = generate_roadmap(&state.pipeline, range, request.input(), provider).await?;
    Ok(ApiResponse::ok(roadmap))
}
