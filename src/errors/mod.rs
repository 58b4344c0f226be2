/// Error taxonomy for the bot
///
/// Every fallible operation in the library returns [`BotError`]. The variant
/// decides how far a failure propagates:
/// - `Config` / `Captcha`: abort the batch, return to the menu
/// - `Auth`: skip the wallet, keep the batch going
/// - `Transport`: skip the single action, keep the cycle going
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BotError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Transport error: {message}")]
    Transport {
        /// HTTP status when the server answered at all
        status: Option<u16>,
        message: String,
    },

    #[error("Captcha error: {0}")]
    Captcha(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BotError {
    /// Network/proxy/malformed-response failure without an HTTP status
    pub fn transport(message: impl Into<String>) -> Self {
        BotError::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Server answered with a non-success status
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        BotError::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        BotError::Auth(message.into())
    }

    pub fn captcha(message: impl Into<String>) -> Self {
        BotError::Captcha(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        BotError::Config(message.into())
    }

    /// Ends the current batch attempt and returns control to the menu
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, BotError::Config(_) | BotError::Captcha(_))
    }

    /// Skips the current wallet only
    pub fn is_wallet_scoped(&self) -> bool {
        matches!(self, BotError::Auth(_))
    }

    /// Skips the current action only
    pub fn is_action_scoped(&self) -> bool {
        matches!(self, BotError::Transport { .. })
    }

    /// HTTP status attached to a transport failure
    pub fn status(&self) -> Option<u16> {
        match self {
            BotError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Underlying cause without the category prefix
    pub fn cause(&self) -> &str {
        match self {
            BotError::Auth(m) | BotError::Captcha(m) | BotError::Config(m) => m,
            BotError::Transport { message, .. } => message,
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => BotError::http(status.as_u16(), e.to_string()),
            None => BotError::transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for BotError {
    fn from(e: serde_json::Error) -> Self {
        BotError::transport(format!("Malformed response: {}", e))
    }
}
