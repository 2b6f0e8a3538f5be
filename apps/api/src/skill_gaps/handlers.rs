//! Axum route handler for skill-gap analysis.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::mock;
use crate::models::{within, CareerPathMinimal, ResumeProfile, SkillGapAnalysis, Validate};
use crate::response::ApiResponse;
use crate::routes::validated::ValidatedJson;
use crate::routes::{resolve_provider, GenerationQuery};
use crate::state::AppState;

use super::analyze_skill_gaps;

/// Accepts either path variant; the full variant's extra fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapRequest {
    pub profile: ResumeProfile,
    pub career_path: CareerPathMinimal,
    #[serde(default)]
    pub provider: Option<String>,
}

impl Validate for SkillGapRequest {
    fn validate(&self) -> Result<(), String> {
        within("profile", self.profile.validate())?;
        within("careerPath", self.career_path.validate())
    }
}

/// POST /api/skill-gaps
pub async fn handle_analyze_skill_gaps(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<SkillGapRequest>,
) -> Result<Json<ApiResponse<SkillGapAnalysis>>, AppError> {
    if query.is_mock() {
        return Ok(ApiResponse::ok(mock::skill_gap_analysis(
            &request.profile,
            &request.career_path,
        )));
    }

    let provider = resolve_provider(&state, request.provider.as_deref(), &headers)?;
    let analysis =
        analyze_skill_gaps(&state.pipeline, &request.profile, &request.career_path, provider)
            .await?;
    Ok(ApiResponse::ok(analysis))
}
