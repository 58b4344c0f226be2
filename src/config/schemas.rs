/// Configuration schemas - every section defined once with its defaults
///
/// Each struct is declared through `config_struct!`, so a missing section or
/// field in `data/config.toml` falls back to the value written here.
use crate::config_struct;

// ============================================================================
// PLATFORM CONFIGURATION
// ============================================================================

config_struct! {
    /// Remote platform endpoints, sign-in message fields and identity headers
    pub struct PlatformConfig {
        /// REST API base (all endpoint paths are appended to this)
        api_base_url: String = "https://api.blockstreet.money/api".to_string(),
        /// Sent as `origin`
        origin: String = "https://blockstreet.money".to_string(),
        /// Sent as `Referer`
        referer: String = "https://blockstreet.money/".to_string(),

        // Sign-in message fields (the server re-renders this text to verify)
        siwe_domain: String = "blockstreet.money".to_string(),
        siwe_statement: String = "Welcome to Block Street".to_string(),
        siwe_uri: String = "https://blockstreet.money".to_string(),
        chain_id: u64 = 1,
        /// Seconds between `Issued At` and `Expiration Time`
        signin_validity_secs: i64 = 120,

        /// Ask the server for a nonce instead of generating one locally
        use_server_nonce: bool = false,
        /// Referral code sent with every sign-in
        invite_code: String = String::new(),

        /// Name of the session cookie issued by the platform
        session_cookie_name: String = "gfsessionid".to_string(),

        // Identity headers (empty values are still sent, `token` only when set)
        fingerprint: String = String::new(),
        abs: String = String::new(),
        token: String = String::new(),
        /// Sign-in `timestamp` header; empty means "current time in ms"
        static_timestamp: String = String::new(),
        /// Sign-in `signature` header used when `use_static_signature` is on
        static_signature: String = String::new(),
        use_static_signature: bool = false,

        // Captcha target
        turnstile_site_key: String = "0x4AAAAAABpfyUqunlqwRBYN".to_string(),
        captcha_page_url: String = "https://blockstreet.money/dashboard".to_string(),

        request_timeout_secs: u64 = 30,
    }
}

// ============================================================================
// CAPTCHA CONFIGURATION
// ============================================================================

config_struct! {
    /// CapMonster solving service
    pub struct CaptchaConfig {
        api_base_url: String = "https://api.capmonster.cloud".to_string(),
        /// File holding the API key (overridden by CAPMONSTER_API_KEY)
        api_key_path: String = "data/key.txt".to_string(),
        poll_interval_ms: u64 = 5_000,
        /// Upper bound on `processing` polls before giving up
        max_poll_attempts: u32 = 120,
    }
}

// ============================================================================
// PROXY CONFIGURATION
// ============================================================================

config_struct! {
    /// Outbound proxy list
    pub struct ProxyConfig {
        enabled: bool = true,
        file_path: String = "data/proxies.txt".to_string(),
    }
}

// ============================================================================
// SCHEDULER CONFIGURATION
// ============================================================================

config_struct! {
    /// Per-cycle action counts, amount range and pacing
    pub struct SchedulerConfig {
        /// Fetch supplied positions at the start of each cycle
        fetch_supplies: bool = true,

        swap_count: u32 = 5,
        supply_count: u32 = 2,
        withdraw_count: u32 = 2,
        borrow_count: u32 = 2,
        repay_count: u32 = 1,

        amount_min: f64 = 0.001,
        amount_max: f64 = 0.0015,

        action_delay_min_ms: u64 = 5_000,
        action_delay_max_ms: u64 = 10_000,
    }
}

// ============================================================================
// RUNNER CONFIGURATION
// ============================================================================

config_struct! {
    /// Batch-level pacing
    pub struct RunnerConfig {
        /// Pause between transactions of one wallet in single-action mode
        transaction_delay_ms: u64 = 1_000,
        /// Pause between wallets in single-action mode
        wallet_delay_ms: u64 = 3_000,
        /// Pause between wallets in daily mode
        daily_wallet_delay_ms: u64 = 5_000,
        /// Sleep between two full daily passes
        daily_interval_secs: u64 = 86_400,
        /// Daily check-in on the setup wallet before each batch
        share_on_setup: bool = true,
    }
}

// ============================================================================
// WALLET CONFIGURATION
// ============================================================================

config_struct! {
    /// Wallet sources
    pub struct WalletsConfig {
        /// Environment variable prefix for private keys
        env_prefix: String = "PRIVATE_KEY_".to_string(),
        /// Append-only record of wallets created by tool_wallet_manager
        store_path: String = "data/wallets.json".to_string(),
        /// Also run wallets from `store_path`
        include_stored_wallets: bool = false,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration (`data/config.toml`)
    pub struct Config {
        platform: PlatformConfig = PlatformConfig::default(),
        captcha: CaptchaConfig = CaptchaConfig::default(),
        proxy: ProxyConfig = ProxyConfig::default(),
        scheduler: SchedulerConfig = SchedulerConfig::default(),
        runner: RunnerConfig = RunnerConfig::default(),
        wallets: WalletsConfig = WalletsConfig::default(),
    }
}
