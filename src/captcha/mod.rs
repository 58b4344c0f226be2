//! Captcha solving
//!
//! The run loop needs one Turnstile token per batch. [`CaptchaSolver`] hides
//! the submit-and-poll protocol of the solving service behind a single call;
//! [`CapMonsterSolver`] is the production implementation.

pub mod capmonster;

use async_trait::async_trait;
use std::path::Path;

use crate::errors::BotError;

pub use capmonster::{
    classify_poll, ApiKeySource, CapMonsterSolver, JsonPoster, PollStatus, ReqwestPoster,
};

#[async_trait]
pub trait CaptchaSolver: Send + Sync {
    /// Token for `site_key` on `page_url`; failures are `Captcha` or `Config` errors
    async fn solve(&self, site_key: &str, page_url: &str) -> Result<String, BotError>;
}

/// API key from `env_value` (CAPMONSTER_API_KEY) or else the key file
///
/// Missing or blank keys are configuration errors.
pub fn load_api_key(env_value: Option<String>, key_path: &Path) -> Result<String, BotError> {
    if let Some(key) = env_value.map(|k| k.trim().to_string()) {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    let contents = std::fs::read_to_string(key_path).map_err(|e| {
        BotError::config(format!(
            "Failed to read CapMonster API key from {}: {}",
            key_path.display(),
            e
        ))
    })?;

    let key = contents.trim().to_string();
    if key.is_empty() {
        return Err(BotError::config(format!(
            "CapMonster API key is missing or empty in {}",
            key_path.display()
        )));
    }
    Ok(key)
}
