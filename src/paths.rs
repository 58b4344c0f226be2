//! Centralized path resolution for BlockStreet Bot
//!
//! All file and directory paths are resolved through this module so the bot,
//! the wallet manager tool and the tests agree on where things live.
//!
//! ## Directory Structure
//!
//! ```text
//! <base>/
//! ├── .env
//! ├── data/
//! │   ├── config.toml
//! │   ├── proxies.txt
//! │   ├── key.txt
//! │   └── wallets.json
//! └── logs/
//!     └── blockstreetbot_*.log
//! ```
//!
//! The base directory is `$BLOCKSTREETBOT_HOME` when set, otherwise the
//! current working directory.

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Environment variable that overrides the base directory
pub const HOME_ENV_VAR: &str = "BLOCKSTREETBOT_HOME";

/// Tracks whether the base directory has been resolved
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Lazy-initialized base directory (thread-safe)
static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(|| {
    let base_dir = resolve_base_directory();
    INITIALIZED.store(true, Ordering::SeqCst);
    base_dir
});

fn resolve_base_directory() -> PathBuf {
    if let Ok(dir) = std::env::var(HOME_ENV_VAR) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir.trim());
        }
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// =============================================================================
// DIRECTORY ACCESSORS
// =============================================================================

/// Returns the base directory for all bot data
pub fn get_base_directory() -> PathBuf {
    BASE_DIRECTORY.clone()
}

/// Returns the data directory path (config, proxies, key file, wallet records)
pub fn get_data_directory() -> PathBuf {
    BASE_DIRECTORY.join("data")
}

/// Returns the logs directory path
pub fn get_logs_directory() -> PathBuf {
    BASE_DIRECTORY.join("logs")
}

// =============================================================================
// FILE PATHS
// =============================================================================

/// Returns the main configuration file path
pub fn get_config_path() -> PathBuf {
    get_data_directory().join("config.toml")
}

/// Returns the `.env` file path holding `PRIVATE_KEY_*` entries
pub fn get_env_file_path() -> PathBuf {
    BASE_DIRECTORY.join(".env")
}

/// Resolves a configured path: absolute paths are kept, relative ones are
/// anchored at the base directory.
pub fn resolve(path: &str) -> PathBuf {
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() {
        candidate
    } else {
        BASE_DIRECTORY.join(candidate)
    }
}

/// Whether the base directory has already been resolved
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}

/// Create every directory the bot writes into
///
/// Must run before `logger::init()` since file logging opens `logs/`.
pub fn ensure_all_directories() -> Result<(), String> {
    if !is_initialized() {
        eprintln!("Base directory: {}", get_base_directory().display());
    }

    let dirs_to_create = vec![
        ("base", get_base_directory()),
        ("data", get_data_directory()),
        ("logs", get_logs_directory()),
    ];

    for (name, dir) in dirs_to_create {
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                format!(
                    "Failed to create {} directory at {}: {}",
                    name,
                    dir.display(),
                    e
                )
            })?;

            eprintln!("Created directory: {}", dir.display());
        }
    }

    Ok(())
}
