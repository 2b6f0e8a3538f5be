//! Axum route handlers for career-path generation.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::mock;
use crate::models::{
    require_text, within, CareerPath, CareerPathDetails, CareerPathMinimal, ResumeProfile,
    Validate,
};
use crate::response::ApiResponse;
use crate::routes::validated::ValidatedJson;
use crate::routes::{resolve_provider, GenerationQuery};
use crate::state::AppState;

use super::{
    generate_paths_full, generate_paths_minimal, get_path_details, DEFAULT_PATH_COUNT,
    MAX_PATH_COUNT,
};

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathsRequest {
    pub profile: ResumeProfile,
    #[serde(default, alias = "numberOfPaths")]
    pub count: Option<usize>,
    #[serde(default)]
    pub provider: Option<String>,
}

impl PathsRequest {
    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_PATH_COUNT)
    }
}

impl Validate for PathsRequest {
    fn validate(&self) -> Result<(), String> {
        within("profile", self.profile.validate())?;
        if !(1..=MAX_PATH_COUNT).contains(&self.count()) {
            return Err(format!("count must be between 1 and {MAX_PATH_COUNT}"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsRequest {
    pub profile: ResumeProfile,
    pub role_id: String,
    pub role_name: String,
    #[serde(default)]
    pub provider: Option<String>,
}

impl Validate for DetailsRequest {
    fn validate(&self) -> Result<(), String> {
        within("profile", self.profile.validate())?;
        require_text("roleId", &self.role_id, 120)?;
        require_text("roleName", &self.role_name, 200)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/career-paths
///
/// Fast minimal list for the selection screen.
pub async fn handle_generate_paths(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<PathsRequest>,
) -> Result<Json<ApiResponse<Vec<CareerPathMinimal>>>, AppError> {
    if query.is_mock() {
        let paths = mock::career_paths(&request.profile, request.count());
        return Ok(ApiResponse::ok(paths.iter().map(CareerPath::minimal).collect()));
    }

    let provider = resolve_provider(&state, request.provider.as_deref(), &headers)?;
    let paths =
        generate_paths_minimal(&state.pipeline, &request.profile, request.count(), provider)
            .await?;
    Ok(ApiResponse::ok(paths))
}

/// POST /api/career-paths/full
///
/// Legacy variant: every path with effort, reward and reasoning in one call.
pub async fn handle_generate_paths_full(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<PathsRequest>,
) -> Result<Json<ApiResponse<Vec<CareerPath>>>, AppError> {
    if query.is_mock() {
        return Ok(ApiResponse::ok(mock::career_paths(
            &request.profile,
            request.count(),
        )));
    }

    let provider = resolve_provider(&state, request.provider.as_deref(), &headers)?;
    let paths =
        generate_paths_full(&state.pipeline, &request.profile, request.count(), provider).await?;
    Ok(ApiResponse::ok(paths))
}

/// POST /api/career-paths/details
///
/// Detail fields for the selected path only.
pub async fn handle_path_details(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<DetailsRequest>,
) -> Result<Json<ApiResponse<CareerPathDetails>>, AppError> {
    if query.is_mock() {
        return Ok(ApiResponse::ok(mock::path_details(
            &request.role_id,
            &request.role_name,
        )));
    }

    let provider = resolve_provider(&state, request.provider.as_deref(), &headers)?;
    let details = get_path_details(
        &state.pipeline,
        &request.profile,
        &request.role_id,
        &request.role_name,
        provider,
    )
    .await?;
    Ok(ApiResponse::ok(details))
}
