mod cache;
mod config;
mod errors;
mod llm_client;
mod mock;
mod models;
mod paths;
mod pipeline;
mod rate_limit;
mod recovery;
mod response;
mod resume;
mod roadmap;
mod routes;
mod skill_gaps;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::llm_client::anthropic::AnthropicProvider;
use crate::llm_client::openai::OpenAiProvider;
use crate::llm_client::ProviderRouter;
use crate::pipeline::Pipeline;
use crate::rate_limit::RateLimiter;
use crate::routes::build_router;
use crate::state::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting CareerPilot API v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.app_env
    );

    if config.anthropic_api_key.is_none() {
        warn!("ANTHROPIC_API_KEY not set; anthropic calls will fail");
    }
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set; openai calls will fail");
    }

    let router = ProviderRouter::new(config.default_provider)
        .with_provider(Arc::new(AnthropicProvider::new(
            config.anthropic_api_key.clone(),
            config.llm_timeout_secs,
            config.llm_max_retries,
        )?))
        .with_provider(Arc::new(OpenAiProvider::new(
            config.openai_api_key.clone(),
            config.llm_timeout_secs,
            config.llm_max_retries,
        )?));
    info!("Provider router initialized (default: {})", config.default_provider);

    let cache = Arc::new(ResponseCache::new(config.cache_enabled));
    info!(
        "Response cache {}",
        if config.cache_enabled { "enabled" } else { "disabled" }
    );

    let rate_limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    ));

    spawn_sweeper(cache.clone(), rate_limiter.clone());

    let state = AppState {
        config: config.clone(),
        pipeline: Pipeline::new(Arc::new(router), cache),
        rate_limiter,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Periodically drops expired cache entries and idle rate-limit buckets.
fn spawn_sweeper(cache: Arc<ResponseCache>, rate_limiter: Arc<RateLimiter>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let expired = cache.purge_expired().await;
            let idle = rate_limiter.purge_idle();
            debug!("Sweep removed {expired} cache entries and {idle} idle clients");
        }
    });
}
