//! Structured logging system for BlockStreet Bot
//!
//! This module provides a small, ergonomic logging API with:
//! - Automatic debug mode filtering from command-line arguments
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-subsystem debug control via --debug-<tag> flags
//! - Dual output: colored console + daily log file
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockstreetbot::logger::{self, LogTag};
//!
//! logger::error(LogTag::Session, "Sign verify failed");
//! logger::warning(LogTag::Scheduler, "No supplied assets found");
//! logger::info(LogTag::Runner, "Processing wallet 1/3");
//! logger::debug(LogTag::Api, "POST /supply"); // Only if --debug-api
//! ```
//!
//! Call [`init`] once at startup, after `paths::ensure_all_directories()`.

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{
    get_logger_config, init_from_args, set_logger_config, update_logger_config, LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Parses debug flags from the global arguments and opens the log file.
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (shown unless --quiet raises nothing above warnings)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, only when --debug-<tag> is given
///
/// ```rust,ignore
/// // Only shown with --debug-session
/// logger::debug(LogTag::Session, "Captured gfsessionid cookie");
/// ```
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, only with --verbose or --verbose-<tag>
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
pub fn flush() {
    file::flush_file_logging();
}
