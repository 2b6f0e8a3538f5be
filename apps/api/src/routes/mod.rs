pub mod health;
pub mod validated;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderMap,
    middleware,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::ProviderKind;
use crate::rate_limit;
use crate::resume::document::MAX_UPLOAD_BYTES;
use crate::state::AppState;
use crate::{paths, resume, roadmap, skill_gaps};

/// Header carrying the caller's session-level provider preference.
pub const PROVIDER_HEADER: &str = "x-ai-provider";

/// Query flags shared by the generation endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct GenerationQuery {
    #[serde(default)]
    pub mock: Option<String>,
}

impl GenerationQuery {
    pub fn is_mock(&self) -> bool {
        matches!(
            self.mock.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("true" | "1" | "yes")
        )
    }
}

/// Body field > `x-ai-provider` header > process default.
pub fn resolve_provider(
    state: &AppState,
    explicit: Option<&str>,
    headers: &HeaderMap,
) -> Result<ProviderKind, AppError> {
    let preference = headers.get(PROVIDER_HEADER).and_then(|v| v.to_str().ok());
    Ok(state.pipeline.router().resolve(explicit, preference)?)
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/interpret-resume", post(resume::handlers::handle_interpret))
        .route(
            "/api/extract-text",
            post(resume::handlers::handle_extract_text)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .route("/api/career-paths", post(paths::handlers::handle_generate_paths))
        .route(
            "/api/career-paths/full",
            post(paths::handlers::handle_generate_paths_full),
        )
        .route(
            "/api/career-paths/details",
            post(paths::handlers::handle_path_details),
        )
        .route(
            "/api/skill-gaps",
            post(skill_gaps::handlers::handle_analyze_skill_gaps),
        )
        .route("/api/roadmap", post(roadmap::handlers::handle_generate_roadmap))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit::enforce,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(api)
        .with_state(state)
}
