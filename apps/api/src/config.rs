use std::num::NonZeroU64;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_TIMEOUT_SECS: NonZeroU64 = match NonZeroU64::new(60) {
    Some(secs) => secs,
    None => panic!("default completion timeout must be non-zero"),
};
const DEFAULT_CURRENTS_BASE_URL: &str = "https://api.currentsapi.services/v1";
const DEFAULT_MIN_POST_CHARS: usize = 1500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("Environment variable '{var}' has an invalid value: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
/// Read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    /// Deadline applied to every completion call.
    pub openai_timeout: Duration,
    pub currents_api_key: String,
    pub currents_base_url: String,
    /// Minimum length, in characters, of an accepted post body.
    pub min_post_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Config {
            openai_api_key: require("OPENAI_API_KEY")?,
            currents_api_key: require("CURRENTS_API_KEY")?,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: lookup("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            // Zero is rejected: every completion call needs a real deadline
            openai_timeout: Duration::from_secs(
                parse_or::<_, NonZeroU64>(
                    &lookup,
                    "OPENAI_TIMEOUT_SECS",
                    DEFAULT_OPENAI_TIMEOUT_SECS,
                )?
                .get(),
            ),
            currents_base_url: lookup("CURRENTS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CURRENTS_BASE_URL.to_string()),
            min_post_chars: parse_or(&lookup, "MIN_POST_CHARS", DEFAULT_MIN_POST_CHARS)?,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var: key, value }),
    }
}
