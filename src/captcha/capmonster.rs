//! CapMonster Cloud client (Turnstile, proxyless)
//!
//! `createTask` once, then `getTaskResult` every `poll_interval_ms` until the
//! task is ready, fails, or `max_poll_attempts` polls have come back
//! `processing`.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;

use super::CaptchaSolver;
use crate::config::CaptchaConfig;
use crate::errors::BotError;
use crate::logger::{self, LogTag};

/// JSON-over-HTTP POST, the only thing the solver needs from the network
#[async_trait]
pub trait JsonPoster: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, BotError>;
}

pub struct ReqwestPoster {
    client: reqwest::Client,
}

impl ReqwestPoster {
    pub fn new(timeout: Duration) -> Result<Self, BotError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::captcha(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl JsonPoster for ReqwestPoster {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, BotError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::captcha(format!("Captcha service unreachable: {}", e)))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| BotError::captcha(format!("Captcha service sent malformed JSON: {}", e)))
    }
}

/// Outcome of one `getTaskResult` poll
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus {
    Ready(String),
    Processing,
    Failed(String),
}

pub fn classify_poll(body: &Value) -> PollStatus {
    match body.get("status").and_then(|s| s.as_str()) {
        Some("ready") => match body
            .get("solution")
            .and_then(|s| s.get("token"))
            .and_then(|t| t.as_str())
        {
            Some(token) if !token.is_empty() => PollStatus::Ready(token.to_string()),
            _ => PollStatus::Failed("ready without a solution token".to_string()),
        },
        Some("processing") => PollStatus::Processing,
        _ => PollStatus::Failed(error_description(body)),
    }
}

fn error_description(body: &Value) -> String {
    body.get("errorDescription")
        .and_then(|d| d.as_str())
        .or_else(|| body.get("errorCode").and_then(|c| c.as_str()))
        .unwrap_or("unknown error")
        .to_string()
}

/// Where the client key comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ApiKeySource {
    Fixed(String),
    /// CAPMONSTER_API_KEY value, else the key file; read on every solve
    Lookup { env_value: Option<String>, key_path: PathBuf },
}

impl ApiKeySource {
    pub fn resolve(&self) -> Result<String, BotError> {
        match self {
            ApiKeySource::Fixed(key) => Ok(key.clone()),
            ApiKeySource::Lookup {
                env_value,
                key_path,
            } => super::load_api_key(env_value.clone(), key_path),
        }
    }
}

pub struct CapMonsterSolver {
    api_key: ApiKeySource,
    config: CaptchaConfig,
    poster: Box<dyn JsonPoster>,
}

impl CapMonsterSolver {
    pub fn new(api_key: String, config: CaptchaConfig, poster: Box<dyn JsonPoster>) -> Self {
        Self::with_key_source(ApiKeySource::Fixed(api_key), config, poster)
    }

    pub fn with_key_source(
        api_key: ApiKeySource,
        config: CaptchaConfig,
        poster: Box<dyn JsonPoster>,
    ) -> Self {
        Self {
            api_key,
            config,
            poster,
        }
    }

    /// Production solver: key from CAPMONSTER_API_KEY or the configured key file
    ///
    /// A missing key surfaces as a `Config` error from `solve`, so callers
    /// that never need a captcha are unaffected.
    pub fn from_config(config: &CaptchaConfig, timeout: Duration) -> Result<Self, BotError> {
        let source = ApiKeySource::Lookup {
            env_value: std::env::var("CAPMONSTER_API_KEY").ok(),
            key_path: crate::paths::resolve(&config.api_key_path),
        };
        let poster = ReqwestPoster::new(timeout)?;
        Ok(Self::with_key_source(source, config.clone(), Box::new(poster)))
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), method)
    }

    async fn create_task(
        &self,
        api_key: &str,
        site_key: &str,
        page_url: &str,
    ) -> Result<Value, BotError> {
        let body = json!({
            "clientKey": api_key,
            "task": {
                "type": "TurnstileTaskProxyless",
                "websiteKey": site_key,
                "websiteUrl": page_url,
            }
        });

        let response = self.poster.post_json(&self.endpoint("createTask"), &body).await?;

        let error_id = response.get("errorId").and_then(|v| v.as_i64()).unwrap_or(-1);
        if error_id != 0 {
            return Err(BotError::captcha(format!(
                "CapMonster submit failed: {}",
                error_description(&response)
            )));
        }

        response
            .get("taskId")
            .filter(|id| !id.is_null())
            .cloned()
            .ok_or_else(|| BotError::captcha("CapMonster submit returned no taskId"))
    }
}

#[async_trait]
impl CaptchaSolver for CapMonsterSolver {
    async fn solve(&self, site_key: &str, page_url: &str) -> Result<String, BotError> {
        let api_key = self.api_key.resolve()?;
        logger::info(LogTag::Captcha, "Solving Cloudflare Turnstile captcha...");

        let task_id = self.create_task(&api_key, site_key, page_url).await?;
        let poll_body = json!({ "clientKey": api_key, "taskId": task_id });
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 1..=self.config.max_poll_attempts {
            tokio::time::sleep(interval).await;

            let response = self
                .poster
                .post_json(&self.endpoint("getTaskResult"), &poll_body)
                .await?;

            match classify_poll(&response) {
                PollStatus::Ready(token) => {
                    logger::info(LogTag::Captcha, "Captcha solved successfully");
                    return Ok(token);
                }
                PollStatus::Processing => {
                    logger::debug(
                        LogTag::Captcha,
                        &format!("Captcha not ready (poll {})", attempt),
                    );
                }
                PollStatus::Failed(description) => {
                    return Err(BotError::captcha(format!(
                        "CapMonster solve failed: {}",
                        description
                    )));
                }
            }
        }

        Err(BotError::captcha(format!(
            "Captcha not solved after {} polls",
            self.config.max_poll_attempts
        )))
    }
}
