use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::router::UnknownProvider;
use crate::llm_client::LlmError;
use crate::recovery::RecoveryError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Provider failures and unusable responses are deliberately separate variants:
/// the first means "ask the model again", the second "the model answered garbage".
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Rate limit exceeded. Try again in {retry_after_secs} seconds (resets at {reset_at})")]
    RateLimited {
        retry_after_secs: u64,
        reset_at: String,
    },

    #[error("AI provider request failed: {0}")]
    Provider(String),

    #[error("AI response could not be used: {0}")]
    UnusableResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Provider(err.to_string())
    }
}

/// Unknown provider identifiers are caller mistakes; they never fall back silently.
impl From<UnknownProvider> for AppError {
    fn from(err: UnknownProvider) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<RecoveryError> for AppError {
    fn from(err: RecoveryError) -> Self {
        AppError::UnusableResponse(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Provider(_) | AppError::UnusableResponse(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::RateLimited { .. } => "RATE_LIMITED",
            AppError::Provider(_) => "PROVIDER_ERROR",
            AppError::UnusableResponse(_) => "UNUSABLE_RESPONSE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Provider(msg) => {
                tracing::error!("Provider error: {msg}");
                self.to_string()
            }
            AppError::UnusableResponse(msg) => {
                tracing::error!("Unusable AI response: {msg}");
                self.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": message,
            "code": self.code(),
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_per_class() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RateLimited {
                retry_after_secs: 3,
                reset_at: "soon".into()
            }
            .status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::Provider("down".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::UnusableResponse("garbage".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_provider_and_unusable_are_distinguishable() {
        let provider = AppError::Provider("timeout".into());
        let unusable = AppError::UnusableResponse("no fields".into());
        assert_ne!(provider.code(), unusable.code());
        assert!(provider.to_string().contains("provider"));
        assert!(unusable.to_string().contains("could not be used"));
    }

    #[test]
    fn test_unknown_provider_is_validation_error() {
        let err: AppError = UnknownProvider("gemini".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    fn test_validation_message_is_passed_through() {
        let err = AppError::Validation("profile.yearsOfExperience must be >= 0".into());
        assert_eq!(err.to_string(), "profile.yearsOfExperience must be >= 0");
    }
}
