use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the OpenAI-compatible completion API
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Bearer token for the completion API
    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,

    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,

    #[serde(default)]
    pub sonarr_url: Option<String>,

    #[serde(default)]
    pub sonarr_api_key: Option<String>,

    #[serde(default)]
    pub radarr_url: Option<String>,

    #[serde(default)]
    pub radarr_api_key: Option<String>,

    #[serde(default)]
    pub plex_url: Option<String>,

    #[serde(default)]
    pub plex_token: Option<String>,

    /// Request timeout applied to every outbound HTTP client
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Allow browser clients from any origin
    #[serde(default = "default_cors_allow_any")]
    pub cors_allow_any: bool,

    /// Number of recommendations requested when the caller does not say
    #[serde(default = "default_recommendation_count")]
    pub default_recommendation_count: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_openai_max_tokens() -> u32 {
    800
}

fn default_openai_temperature() -> f32 {
    0.8
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_cors_allow_any() -> bool {
    true
}

fn default_recommendation_count() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            openai_api_url: default_openai_api_url(),
            openai_api_key: None,
            openai_model: default_openai_model(),
            openai_max_tokens: default_openai_max_tokens(),
            openai_temperature: default_openai_temperature(),
            sonarr_url: None,
            sonarr_api_key: None,
            radarr_url: None,
            radarr_api_key: None,
            plex_url: None,
            plex_token: None,
            http_timeout_secs: default_http_timeout_secs(),
            cors_allow_any: default_cors_allow_any(),
            default_recommendation_count: default_recommendation_count(),
        }
    }
}

/// Base URL plus credential for one external service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub base_url: String,
    pub secret: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn sonarr(&self) -> AppResult<ServiceCredentials> {
        credentials("Sonarr", &self.sonarr_url, &self.sonarr_api_key)
    }

    pub fn radarr(&self) -> AppResult<ServiceCredentials> {
        credentials("Radarr", &self.radarr_url, &self.radarr_api_key)
    }

    pub fn plex(&self) -> AppResult<ServiceCredentials> {
        credentials("Plex", &self.plex_url, &self.plex_token)
    }

    pub fn openai(&self) -> AppResult<ServiceCredentials> {
        credentials(
            "OpenAI",
            &Some(self.openai_api_url.clone()),
            &self.openai_api_key,
        )
    }
}

/// Both halves must be present and non-blank; base URLs lose any trailing slash.
fn credentials(
    service: &str,
    url: &Option<String>,
    secret: &Option<String>,
) -> AppResult<ServiceCredentials> {
    let base_url = url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{} URL is not set", service)))?;

    let secret = secret
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{} credential is not set", service)))?;

    Ok(ServiceCredentials {
        base_url: base_url.trim_end_matches('/').to_string(),
        secret: secret.to_string(),
    })
}
