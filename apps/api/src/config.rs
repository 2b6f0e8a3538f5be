use anyhow::{bail, Context, Result};

use crate::llm_client::router::ProviderKind;

/// Application configuration loaded from environment variables.
/// Only malformed values are fatal; vendor keys may be absent.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub app_env: String,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub default_provider: ProviderKind,
    pub cache_enabled: bool,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub roadmap_min_phases: usize,
    pub roadmap_max_phases: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());
        let is_development = app_env.eq_ignore_ascii_case("development");

        let default_provider = match optional_env("DEFAULT_AI_PROVIDER") {
            Some(raw) => raw
                .parse::<ProviderKind>()
                .map_err(|e| anyhow::anyhow!("DEFAULT_AI_PROVIDER is invalid: {e}"))?,
            None => ProviderKind::default(),
        };

        let cache_enabled = match optional_env("ENABLE_RESPONSE_CACHE") {
            Some(raw) => parse_bool(&raw).context("ENABLE_RESPONSE_CACHE must be true or false")?,
            None => !is_development,
        };

        let roadmap_min_phases = parse_env("ROADMAP_MIN_PHASES", 2)?;
        let roadmap_max_phases = parse_env("ROADMAP_MAX_PHASES", 5)?;
        if roadmap_min_phases == 0 || roadmap_min_phases > roadmap_max_phases {
            bail!(
                "ROADMAP_MIN_PHASES ({roadmap_min_phases}) must be >= 1 and <= ROADMAP_MAX_PHASES ({roadmap_max_phases})"
            );
        }

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            app_env,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            default_provider,
            cache_enabled,
            rate_limit_max_requests: parse_env("RATE_LIMIT_MAX_REQUESTS", 20)?,
            rate_limit_window_secs: parse_env("RATE_LIMIT_WINDOW_SECS", 900)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            llm_max_retries: parse_env("LLM_MAX_RETRIES", 3)?,
            roadmap_min_phases,
            roadmap_max_phases,
        })
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            app_env: "test".to_string(),
            anthropic_api_key: None,
            openai_api_key: None,
            default_provider: ProviderKind::default(),
            cache_enabled: true,
            rate_limit_max_requests: 20,
            rate_limit_window_secs: 900,
            llm_timeout_secs: 120,
            llm_max_retries: 3,
            roadmap_min_phases: 2,
            roadmap_max_phases: 5,
        }
    }
}

/// Returns the variable if set and non-blank.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Environment variable '{key}' is invalid: {e}")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("'{other}' is not a boolean"),
    }
}
