//! Axum route handlers for resume interpretation and document upload.

use axum::{
    extract::{Multipart, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::mock;
use crate::models::{require_text, ResumeProfile, Validate};
use crate::response::ApiResponse;
use crate::routes::validated::ValidatedJson;
use crate::routes::{resolve_provider, GenerationQuery};
use crate::state::AppState;

use super::document::{self, DocumentKind};
use super::{interpret_resume, MAX_RESUME_CHARS};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequest {
    pub resume_text: String,
    #[serde(default)]
    pub provider: Option<String>,
}

impl Validate for InterpretRequest {
    fn validate(&self) -> Result<(), String> {
        require_text("resumeText", &self.resume_text, MAX_RESUME_CHARS)
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub characters: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/interpret-resume
///
/// Turns raw resume text into a structured profile.
pub async fn handle_interpret(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<InterpretRequest>,
) -> Result<Json<ApiResponse<ResumeProfile>>, AppError> {
    if query.is_mock() {
        return Ok(ApiResponse::ok(mock::profile_from_text(&request.resume_text)));
    }

    let provider = resolve_provider(&state, request.provider.as_deref(), &headers)?;
    let profile = interpret_resume(&state.pipeline, &request.resume_text, provider).await?;
    Ok(ApiResponse::ok(profile))
}

/// POST /api/extract-text
///
/// Multipart upload (`file` field, plain text or PDF). Returns the extracted text.
pub async fn handle_extract_text(
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ExtractedText>>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let kind = DocumentKind::detect(field.file_name(), field.content_type()).ok_or_else(
            || AppError::Validation("file must be a PDF or plain-text document".to_string()),
        )?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let text = document::extract_text(kind, data).await?;
        let characters = text.chars().count();
        return Ok(ApiResponse::ok(ExtractedText { text, characters }));
    }

    Err(AppError::Validation("file is required".to_string()))
}
