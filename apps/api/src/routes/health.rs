use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and the active cache/provider settings.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "careerpilot-api",
        "cacheEnabled": state.pipeline.cache().is_enabled(),
        "defaultProvider": state.pipeline.router().default_provider(),
    }))
}
