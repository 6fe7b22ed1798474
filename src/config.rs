//! Application configuration.
//!
//! Values are read from environment variables (and a `.env` file when
//! present) with the `PROFILE_EXPLORER` prefix and `__` as separator, for
//! example `PROFILE_EXPLORER__API_BASE_URL=http://localhost:8080`.

use std::env;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::state::StalePolicy;

const ENV_PREFIX: &str = "PROFILE_EXPLORER";

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("API base URL must be an absolute http(s) URL: {0}")]
    InvalidApiBaseUrl(String),

    #[error("User agent must not be empty")]
    EmptyUserAgent,

    #[error("Request timeout must be greater than zero")]
    InvalidTimeout,

    #[error("Avatar size must be greater than zero")]
    InvalidAvatarSize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Root of the GitHub REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Personal access token. Falls back to `GITHUB_TOKEN`; unauthenticated
    /// when neither is set.
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout. Requests never time out when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Edge length in pixels of the avatar shown on the card.
    #[serde(default = "default_avatar_size")]
    pub avatar_size: u32,

    #[serde(default)]
    pub stale_policy: StalePolicy,

    /// Fallback tracing filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    concat!("github-profile-explorer/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_avatar_size() -> u32 {
    128
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            user_agent: default_user_agent(),
            token: None,
            timeout_secs: None,
            avatar_size: default_avatar_size(),
            stale_policy: StalePolicy::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Loads `.env` if present, then reads `PROFILE_EXPLORER__*` variables.
    /// Every setting has a default, so an empty environment is valid.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if config.token.is_none() {
            config.token = env::var("GITHUB_TOKEN").ok();
        }
        config.token = config.token.filter(|t| !t.is_empty());

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api_base_url()?;

        if self.user_agent.trim().is_empty() {
            return Err(ValidationError::EmptyUserAgent);
        }
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.avatar_size == 0 {
            return Err(ValidationError::InvalidAvatarSize);
        }
        Ok(())
    }

    /// The parsed API base URL.
    pub fn api_base_url(&self) -> Result<Url, ValidationError> {
        let invalid = || ValidationError::InvalidApiBaseUrl(self.api_base_url.clone());
        let url = Url::parse(&self.api_base_url).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(invalid());
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
