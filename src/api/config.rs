//! Application configuration.
//!
//! Configuration is read once at process start from environment variables
//! (optionally seeded from a `.env` file) and handed to [`AppState`] by value.
//!
//! [`AppState`]: crate::routes::AppState

use std::env;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use crate::services::prompt_service::{DEFAULT_FREEFORM_PROMPT, DEFAULT_STRUCTURED_PROMPT};

const DEV_JWT_SECRET: &str = "dev-secret-do-not-use-in-production-change-me-now";

/// Upper bound for `JWT_EXPIRE_MINUTES` (one year)
pub const MAX_JWT_EXPIRE_MINUTES: i64 = 525_600;

/// Configuration loading errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A variable is present but cannot be parsed
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
    /// A required variable is absent
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:8080".to_string()],
            log_json: false,
        }
    }
}

/// Token signing settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expire_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_JWT_SECRET.to_string(),
            expire_minutes: 1440,
        }
    }
}

/// Upstream model provider settings.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub gemini_api_key: Option<String>,
    /// Model used when a generation request names none
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub chat_api_key: Option<String>,
    pub chat_base_url: String,
    pub chat_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub structured_prompt: String,
    pub freeform_prompt: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: "gemini-2.5-pro".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            chat_api_key: None,
            chat_base_url: "https://api.aihubmix.com".to_string(),
            chat_model: "gpt-5.1".to_string(),
            max_tokens: 128_000,
            temperature: 0.3,
            structured_prompt: DEFAULT_STRUCTURED_PROMPT.to_string(),
            freeform_prompt: DEFAULT_FREEFORM_PROMPT.to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// PostgreSQL URL; in-memory storage is used when absent
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// In production (APP_ENV != "development") a JWT secret is required.
    /// In development an insecure default secret is used with a warning.
    pub fn from_env() -> Result<Self, ConfigError> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());
        let is_development = app_env.eq_ignore_ascii_case("development");

        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: var_or("BACKEND_HOST", &server_defaults.host),
            port: parse_or("BACKEND_PORT", server_defaults.port)?,
            cors_origins: match non_empty_var("CORS_ORIGINS") {
                Some(raw) => raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
                None => server_defaults.cors_origins,
            },
            log_json: non_empty_var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let secret = match non_empty_var("JWT_SECRET_KEY").or_else(|| non_empty_var("JWT_SECRET"))
        {
            Some(s) => s,
            None if is_development => {
                warn!("JWT secret not set! Using default secret for development. DO NOT USE IN PRODUCTION!");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET_KEY".to_string())),
        };
        let expire_minutes =
            parse_or("JWT_EXPIRE_MINUTES", JwtConfig::default().expire_minutes)?;
        if !(1..=MAX_JWT_EXPIRE_MINUTES).contains(&expire_minutes) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRE_MINUTES".to_string(),
                value: expire_minutes.to_string(),
            });
        }
        let jwt = JwtConfig {
            secret,
            expire_minutes,
        };

        let ai_defaults = AiConfig::default();
        let ai = AiConfig {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: var_or("GEMINI_MODEL", &ai_defaults.gemini_model),
            gemini_base_url: var_or("GEMINI_BASE_URL", &ai_defaults.gemini_base_url),
            chat_api_key: non_empty_var("AIHUBMIX_API_KEY"),
            chat_base_url: var_or("AIHUBMIX_BASE_URL", &ai_defaults.chat_base_url),
            chat_model: var_or("AIHUBMIX_MODEL", &ai_defaults.chat_model),
            max_tokens: parse_or("AI_MAX_TOKENS", ai_defaults.max_tokens)?,
            temperature: parse_or("AI_TEMPERATURE", ai_defaults.temperature)?,
            structured_prompt: var_or("AI_MERMAID_SYSTEM_PROMPT", &ai_defaults.structured_prompt),
            freeform_prompt: var_or("AI_EXCALIDRAW_SYSTEM_PROMPT", &ai_defaults.freeform_prompt),
        };

        Ok(Self {
            server,
            database_url: non_empty_var("DATABASE_URL"),
            jwt,
            ai,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    non_empty_var(key).unwrap_or_else(|| default.to_string())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}
