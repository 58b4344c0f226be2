//! Log tags identify which subsystem emitted a line
//!
//! Each tag maps to a `--debug-<key>` flag that enables its debug output.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Session,
    Api,
    Captcha,
    Proxy,
    Wallet,
    Scheduler,
    Runner,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used by `--debug-<key>` / `--verbose-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Session => "session".to_string(),
            LogTag::Api => "api".to_string(),
            LogTag::Captcha => "captcha".to_string(),
            LogTag::Proxy => "proxy".to_string(),
            LogTag::Wallet => "wallet".to_string(),
            LogTag::Scheduler => "scheduler".to_string(),
            LogTag::Runner => "runner".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored label written to the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::Other(s) => s.to_uppercase(),
            other => other.to_debug_key().to_uppercase(),
        }
    }

    /// Every named tag, used when parsing debug flags
    pub fn all() -> Vec<LogTag> {
        vec![
            LogTag::System,
            LogTag::Config,
            LogTag::Session,
            LogTag::Api,
            LogTag::Captcha,
            LogTag::Proxy,
            LogTag::Wallet,
            LogTag::Scheduler,
            LogTag::Runner,
            LogTag::Test,
        ]
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
