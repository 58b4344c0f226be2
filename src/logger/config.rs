/// Logger configuration derived from command-line flags
///
/// Holds the minimum level threshold and the per-tag debug/verbose sets.
/// Stored globally so every `logger::*` call can filter without plumbing.
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped (Debug/Verbose have extra gates)
    pub min_level: LogLevel,
    /// Tags with `--debug-<tag>` enabled
    pub debug_tags: HashSet<String>,
    /// Tags with `--verbose-<tag>` enabled
    pub verbose_tags: HashSet<String>,
    /// `--verbose` given: verbose lines for every tag
    pub verbose_all: bool,
    /// When non-empty, only these tags are printed (errors always pass)
    pub enabled_tags: HashSet<String>,
    /// Mirror console output into logs/
    pub file_logging: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            verbose_all: false,
            enabled_tags: HashSet::new(),
            file_logging: true,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Get a snapshot of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(_) => LoggerConfig::default(),
    }
}

/// Replace the logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    if let Ok(mut current) = LOGGER_CONFIG.write() {
        *current = config;
    }
}

/// Mutate the logger configuration in place
pub fn update_logger_config<F: FnOnce(&mut LoggerConfig)>(f: F) {
    if let Ok(mut current) = LOGGER_CONFIG.write() {
        f(&mut current);
    }
}

/// Build the configuration from the global command-line arguments
pub fn init_from_args() {
    let mut config = LoggerConfig::default();

    for tag in LogTag::all() {
        let key = tag.to_debug_key();
        if arguments::has_arg(&format!("--debug-{}", key)) {
            config.debug_tags.insert(key.clone());
        }
        if arguments::has_arg(&format!("--verbose-{}", key)) {
            config.verbose_tags.insert(key);
        }
    }

    if arguments::is_debug_all_enabled() {
        for tag in LogTag::all() {
            config.debug_tags.insert(tag.to_debug_key());
        }
    }

    config.verbose_all = arguments::is_verbose_enabled();
    if config.verbose_all || !config.debug_tags.is_empty() || !config.verbose_tags.is_empty() {
        config.min_level = LogLevel::Verbose;
    }

    if arguments::is_quiet_enabled() {
        config.min_level = LogLevel::Warning;
    }

    if let Some(level) = arguments::get_arg_value("--log-level").and_then(|v| LogLevel::from_str(&v)) {
        config.min_level = level;
    }

    if arguments::has_arg("--no-log-file") {
        config.file_logging = false;
    }

    set_logger_config(config);
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config().debug_tags.contains(&tag.to_debug_key())
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config().verbose_tags.contains(&tag.to_debug_key())
}
