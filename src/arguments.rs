/// Centralized argument handling for BlockStreet Bot
///
/// Features:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Debug flag checking functions for every log tag
/// - Unified argument parsing utilities shared by the bot and its tools
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by binaries and tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

/// Enables debug output for every tag
pub fn is_debug_all_enabled() -> bool {
    has_arg("--debug-all")
}

/// Session lifecycle debug mode (login, cookies)
pub fn is_debug_session_enabled() -> bool {
    has_arg("--debug-session")
}

/// Raw API request/response debug mode
pub fn is_debug_api_enabled() -> bool {
    has_arg("--debug-api")
}

/// Captcha submit/poll debug mode
pub fn is_debug_captcha_enabled() -> bool {
    has_arg("--debug-captcha")
}

/// Proxy parsing and assignment debug mode
pub fn is_debug_proxy_enabled() -> bool {
    has_arg("--debug-proxy")
}

/// Action scheduler debug mode
pub fn is_debug_scheduler_enabled() -> bool {
    has_arg("--debug-scheduler")
}

/// Verbose mode for every tag
pub fn is_verbose_enabled() -> bool {
    has_arg("--verbose")
}

/// Only warnings and errors
pub fn is_quiet_enabled() -> bool {
    has_arg("--quiet")
}

// =============================================================================
// RUNTIME OPTIONS
// =============================================================================

/// Optional config file path override (`--config <path>`)
pub fn get_config_path_override() -> Option<String> {
    get_arg_value("--config")
}

pub mod patterns {
    use super::has_arg;

    /// `--help` or `-h`
    pub fn is_help_requested() -> bool {
        has_arg("--help") || has_arg("-h")
    }
}

/// Print usage for the interactive bot
pub fn print_help() {
    println!("BlockStreet Bot");
    println!();
    println!("USAGE:");
    println!("    blockstreetbot [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <path>       Use a config file other than data/config.toml");
    println!("    --log-level <level>   error | warning | info | debug | verbose");
    println!("    --quiet               Only show warnings and errors");
    println!("    --verbose             Show verbose output for every subsystem");
    println!("    --no-log-file         Do not write logs/blockstreetbot_*.log");
    println!("    --help, -h            Show this help");
    println!();
    println!("DEBUG FLAGS:");
    println!("    --debug-all           Debug output for every subsystem");
    println!("    --debug-session       Login handshake and cookie handling");
    println!("    --debug-api           Request/response details");
    println!("    --debug-captcha       Captcha submission and polling");
    println!("    --debug-proxy         Proxy parsing and assignment");
    println!("    --debug-scheduler     Action selection and pacing");
    println!("    --debug-wallet        Wallet loading and record storage");
    println!("    --debug-runner        Run loop phase transitions");
    println!();
    println!("FILES (relative to $BLOCKSTREETBOT_HOME or the working directory):");
    println!("    .env                  PRIVATE_KEY_1=..., PRIVATE_KEY_2=..., INVITE_CODE=...");
    println!("    data/config.toml      Bot configuration (defaults used when missing)");
    println!("    data/proxies.txt      One proxy per line");
    println!("    data/key.txt          CapMonster API key");
    println!("    data/wallets.json     Wallets created by tool_wallet_manager");
}

/// Print which debug modes are active
pub fn print_debug_info() {
    let active: Vec<&str> = [
        ("--debug-all", is_debug_all_enabled()),
        ("--debug-session", is_debug_session_enabled()),
        ("--debug-api", is_debug_api_enabled()),
        ("--debug-captcha", is_debug_captcha_enabled()),
        ("--debug-proxy", is_debug_proxy_enabled()),
        ("--debug-scheduler", is_debug_scheduler_enabled()),
        ("--verbose", is_verbose_enabled()),
    ]
    .iter()
    .filter(|(_, enabled)| *enabled)
    .map(|(flag, _)| *flag)
    .collect();

    if !active.is_empty() {
        println!("Debug modes enabled: {}", active.join(", "));
    }
}
