/// Core logging implementation with automatic filtering
///
/// This module contains the central logging logic that:
/// - Checks if a log should be displayed based on level and tag
/// - Delegates to the format module for coloring and writing
use super::config::{get_logger_config, is_debug_enabled_for_tag, is_verbose_enabled_for_tag};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Check against minimum log level threshold
/// 3. Debug level requires --debug-<tag> flag for that tag
/// 4. Verbose level requires --verbose flag OR --verbose-<tag> flag for that tag
/// 5. If enabled_tags is non-empty, tag must be in the set
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    let config = get_logger_config();

    if level == LogLevel::Error {
        return true;
    }

    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug {
        return is_debug_enabled_for_tag(tag);
    }

    if level == LogLevel::Verbose {
        return config.verbose_all || is_verbose_enabled_for_tag(tag);
    }

    if !config.enabled_tags.is_empty() && !config.enabled_tags.contains(&tag.to_debug_key()) {
        return false;
    }

    true
}

/// Internal logging function with automatic filtering
pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level, message);
}

#[cfg(test)]
mod tests {
    use super::super::config::{set_logger_config, LoggerConfig};
    use super::*;

    #[test]
    fn test_filtering_rules() {
        let mut config = LoggerConfig::default();
        config.debug_tags.insert("session".to_string());
        config.min_level = LogLevel::Verbose;
        set_logger_config(config);

        assert!(should_log(&LogTag::Api, LogLevel::Error));
        assert!(should_log(&LogTag::Api, LogLevel::Info));
        assert!(should_log(&LogTag::Session, LogLevel::Debug));
        assert!(!should_log(&LogTag::Api, LogLevel::Debug));

        let mut quiet = LoggerConfig::default();
        quiet.min_level = LogLevel::Warning;
        set_logger_config(quiet);

        assert!(should_log(&LogTag::Runner, LogLevel::Warning));
        assert!(!should_log(&LogTag::Runner, LogLevel::Info));
        assert!(should_log(&LogTag::Runner, LogLevel::Error));

        set_logger_config(LoggerConfig::default());
    }
}
