//! Configuration system
//!
//! - `macros`: `config_struct!` for single-declaration sections with defaults
//! - `schemas`: every section of `data/config.toml`
//! - `utils`: loading, environment overrides and validation

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{
    CaptchaConfig, Config, PlatformConfig, ProxyConfig, RunnerConfig, SchedulerConfig,
    WalletsConfig,
};
pub use utils::{
    apply_env_overrides, load_active_config, load_config_from_path, parse_config, validate_config,
};
