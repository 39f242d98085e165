use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Duration;

use crate::analytics::BestModelPolicy;
use crate::jobs::filter::DEFAULT_SKILL_DISPLAY_CAP;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// How long a fetched job pool stays fresh.
    pub job_cache_window: Duration,
    pub max_pool_jobs: usize,
    pub best_model_policy: BestModelPolicy,
    pub skill_display_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            job_cache_window: Duration::minutes(30),
            max_pool_jobs: 25,
            best_model_policy: BestModelPolicy::default(),
            skill_display_cap: DEFAULT_SKILL_DISPLAY_CAP,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let best_model_policy = match std::env::var("BEST_MODEL_POLICY") {
            Ok(raw) => BestModelPolicy::parse(&raw).ok_or_else(|| {
                anyhow!("BEST_MODEL_POLICY must be 'auc' or a model key, got '{raw}'")
            })?,
            Err(_) => defaults.best_model_policy,
        };

        Ok(Config {
            port: env_or("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            job_cache_window: cache_window(env_or(
                "JOB_CACHE_MINUTES",
                defaults.job_cache_window.num_minutes(),
            )?)?,
            max_pool_jobs: env_or("MAX_POOL_JOBS", defaults.max_pool_jobs)?,
            best_model_policy,
            skill_display_cap: env_or("SKILL_DISPLAY_CAP", defaults.skill_display_cap)?,
        })
    }
}

/// A non-negative number of minutes that fits in a `Duration`.
fn cache_window(minutes: i64) -> Result<Duration> {
    if minutes < 0 {
        bail!("JOB_CACHE_MINUTES must not be negative, got {minutes}");
    }
    Duration::try_minutes(minutes)
        .with_context(|| format!("JOB_CACHE_MINUTES is out of range: {minutes}"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
