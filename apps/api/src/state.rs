use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Provider router and response cache used by every orchestrator.
    pub pipeline: Pipeline,
    pub rate_limiter: Arc<RateLimiter>,
}
