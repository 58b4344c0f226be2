//! Configuration utilities - loading, environment overrides, validation
//!
//! `data/config.toml` is optional: missing files and missing fields fall back
//! to the defaults declared in `schemas.rs`. Secrets and per-deployment values
//! can also come from the environment (`.env` is loaded first by the binaries).
//! The loaded [`Config`] is passed by value to whatever needs it.

use super::schemas::Config;
use crate::errors::BotError;
use std::path::Path;

/// Parse TOML text into a [`Config`]
pub fn parse_config(contents: &str) -> Result<Config, BotError> {
    toml::from_str::<Config>(contents)
        .map_err(|e| BotError::config(format!("Failed to parse config: {}", e)))
}

/// Load configuration from a file, apply environment overrides and validate
///
/// A missing file yields the defaults.
pub fn load_config_from_path(path: &Path) -> Result<Config, BotError> {
    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BotError::config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        parse_config(&contents)?
    } else {
        eprintln!("⚠️  Config file '{}' not found, using default values", path.display());
        Config::default()
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config)?;
    Ok(config)
}

/// Load the configuration the binaries run with
///
/// `--config <path>` wins over `data/config.toml`.
pub fn load_active_config() -> Result<Config, BotError> {
    let path = match crate::arguments::get_config_path_override() {
        Some(path) => crate::paths::resolve(&path),
        None => crate::paths::get_config_path(),
    };
    load_config_from_path(&path)
}

/// Overlay values taken from environment variables
///
/// `lookup` is injected so tests don't have to touch the process environment.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let platform = &mut config.platform;

    if let Some(v) = lookup("INVITE_CODE") {
        platform.invite_code = v.trim().to_string();
    }
    if let Some(v) = lookup("PLATFORM_FINGERPRINT") {
        platform.fingerprint = v;
    }
    if let Some(v) = lookup("PLATFORM_ABS") {
        platform.abs = v;
    }
    if let Some(v) = lookup("PLATFORM_TOKEN") {
        platform.token = v;
    }
    if let Some(v) = lookup("PLATFORM_TIMESTAMP") {
        platform.static_timestamp = v;
    }
    if let Some(v) = lookup("PLATFORM_SIGNATURE") {
        platform.static_signature = v;
    }
    if let Some(v) = lookup("USE_STATIC_SIGNATURE") {
        platform.use_static_signature = is_truthy(&v);
    }
    if let Some(v) = lookup("USE_SERVER_NONCE") {
        platform.use_server_nonce = is_truthy(&v);
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Reject values the scheduler and run loop cannot work with
pub fn validate_config(config: &Config) -> Result<(), BotError> {
    let scheduler = &config.scheduler;

    if !(scheduler.amount_min > 0.0) {
        return Err(BotError::config("scheduler.amount_min must be greater than 0"));
    }
    if scheduler.amount_max < scheduler.amount_min {
        return Err(BotError::config(
            "scheduler.amount_max must be >= scheduler.amount_min",
        ));
    }
    if scheduler.action_delay_max_ms < scheduler.action_delay_min_ms {
        return Err(BotError::config(
            "scheduler.action_delay_max_ms must be >= scheduler.action_delay_min_ms",
        ));
    }
    if config.captcha.poll_interval_ms == 0 {
        return Err(BotError::config("captcha.poll_interval_ms must be greater than 0"));
    }
    if config.captcha.max_poll_attempts == 0 {
        return Err(BotError::config("captcha.max_poll_attempts must be at least 1"));
    }
    if config.platform.signin_validity_secs <= 0 {
        return Err(BotError::config("platform.signin_validity_secs must be positive"));
    }
    if url::Url::parse(&config.platform.api_base_url).is_err() {
        return Err(BotError::config(format!(
            "platform.api_base_url is not a valid URL: {}",
            config.platform.api_base_url
        )));
    }

    Ok(())
}
