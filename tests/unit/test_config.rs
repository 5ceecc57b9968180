//! Unit tests for environment configuration loading

use genai_flow_api::config::{AppConfig, ConfigError};
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
    "APP_ENV",
    "BACKEND_HOST",
    "BACKEND_PORT",
    "CORS_ORIGINS",
    "LOG_FORMAT",
    "JWT_SECRET_KEY",
    "JWT_SECRET",
    "JWT_EXPIRE_MINUTES",
    "GEMINI_API_KEY",
    "GEMINI_MODEL",
    "GEMINI_BASE_URL",
    "AIHUBMIX_API_KEY",
    "AIHUBMIX_BASE_URL",
    "AIHUBMIX_MODEL",
    "AI_MAX_TOKENS",
    "AI_TEMPERATURE",
    "AI_MERMAID_SYSTEM_PROMPT",
    "AI_EXCALIDRAW_SYSTEM_PROMPT",
    "DATABASE_URL",
];

fn clear_env() {
    for var in VARS {
        // SAFETY: tests touching the environment are serialized with #[serial]
        unsafe { env::remove_var(var) };
    }
}

fn set(key: &str, value: &str) {
    // SAFETY: tests touching the environment are serialized with #[serial]
    unsafe { env::set_var(key, value) };
}

#[test]
#[serial]
fn test_secret_required_outside_development() {
    clear_env();

    let err = AppConfig::from_env().unwrap_err();
    assert_eq!(err, ConfigError::Missing("JWT_SECRET_KEY".to_string()));
}

#[test]
#[serial]
fn test_development_defaults() {
    clear_env();
    set("APP_ENV", "development");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.server.port, 8000);
    assert!(!config.jwt.secret.is_empty());
    assert_eq!(config.jwt.expire_minutes, 1440);
    assert_eq!(config.database_url, None);
    assert_eq!(config.ai.gemini_api_key, None);
    assert_eq!(config.ai.gemini_model, "gemini-2.5-pro");
    assert_eq!(config.ai.chat_model, "gpt-5.1");
    assert_eq!(config.ai.max_tokens, 128_000);
    assert!((config.ai.temperature - 0.3).abs() < f32::EPSILON);
}

#[test]
#[serial]
fn test_values_from_environment() {
    clear_env();
    set("JWT_SECRET", "from-legacy-name");
    set("BACKEND_PORT", "9000");
    set("CORS_ORIGINS", "http://a.test, http://b.test,,");
    set("LOG_FORMAT", "JSON");
    set("GEMINI_API_KEY", "g-key");
    set("AIHUBMIX_API_KEY", "  ");
    set("AI_TEMPERATURE", "0.7");
    set("DATABASE_URL", "postgres://localhost/genai");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.jwt.secret, "from-legacy-name");
    assert_eq!(config.server.port, 9000);
    assert_eq!(
        config.server.cors_origins,
        vec!["http://a.test".to_string(), "http://b.test".to_string()]
    );
    assert!(config.server.log_json);
    assert_eq!(config.ai.gemini_api_key.as_deref(), Some("g-key"));
    // Blank values count as unset
    assert_eq!(config.ai.chat_api_key, None);
    assert!((config.ai.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(
        config.database_url.as_deref(),
        Some("postgres://localhost/genai")
    );

    clear_env();
}

#[test]
#[serial]
fn test_invalid_number_is_rejected() {
    clear_env();
    set("JWT_SECRET_KEY", "secret");
    set("BACKEND_PORT", "eighty");

    let err = AppConfig::from_env().unwrap_err();
    assert_eq!(
        err,
        ConfigError::Invalid {
            key: "BACKEND_PORT".to_string(),
            value: "eighty".to_string(),
        }
    );

    clear_env();
}

#[test]
#[serial]
fn test_token_lifetime_out_of_range_is_rejected() {
    for raw in ["0", "-10", "200000000000"] {
        clear_env();
        set("JWT_SECRET_KEY", "secret");
        set("JWT_EXPIRE_MINUTES", raw);

        let err = AppConfig::from_env().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "JWT_EXPIRE_MINUTES".to_string(),
                value: raw.to_string(),
            }
        );
    }

    clear_env();
}

#[test]
#[serial]
fn test_token_lifetime_bounds_are_accepted() {
    for raw in ["1", "525600"] {
        clear_env();
        set("JWT_SECRET_KEY", "secret");
        set("JWT_EXPIRE_MINUTES", raw);

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.jwt.expire_minutes.to_string(), raw);
    }

    clear_env();
}
