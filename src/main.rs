use std::sync::Arc;
use std::time::Duration;

use blockstreetbot::{
    arguments::{patterns, print_debug_info, print_help},
    captcha::CapMonsterSolver,
    config::{self, Config},
    logger::{self as logger, LogTag},
    paths,
    proxy::{load_configured_proxies, ProxyRotator},
    runner::{run_menu, RunLoop},
    session::ReqwestTransportFactory,
    wallet::{
        load_wallets_from_env, load_wallets_from_store, LocalWallet, SignatureProvider,
        WalletStore,
    },
};

/// Main entry point for BlockStreet Bot
///
/// Loads `.env`, the config file, wallets and proxies, then hands control to
/// the interactive menu.
#[tokio::main]
async fn main() {
    // Logger needs logs/ to exist
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("❌ Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();

    if patterns::is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    logger::info(LogTag::System, "🚀 BlockStreet Bot starting up...");
    print_debug_info();

    if let Err(e) = run().await {
        logger::error(LogTag::System, &format!("❌ BlockStreet Bot failed: {:#}", e));
        logger::flush();
        std::process::exit(1);
    }

    logger::flush();
}

async fn run() -> anyhow::Result<()> {
    let env_path = paths::get_env_file_path();
    if dotenv::from_path(&env_path).is_err() {
        logger::debug(
            LogTag::Config,
            &format!("No .env file at {}", env_path.display()),
        );
    }

    let config = config::load_active_config()?;

    let wallets = load_wallets(&config)?;
    if wallets.is_empty() {
        anyhow::bail!(
            "No wallets found. Add {}1=<private key> to {}",
            config.wallets.env_prefix,
            env_path.display()
        );
    }
    logger::info(
        LogTag::Wallet,
        &format!("Loaded {} wallet(s)", wallets.len()),
    );

    let rotator = ProxyRotator::round_robin(load_configured_proxies(&config.proxy));
    if rotator.is_empty() {
        logger::warning(LogTag::Proxy, "Running without proxies");
    }

    let timeout = Duration::from_secs(config.platform.request_timeout_secs);
    let factory = Arc::new(ReqwestTransportFactory::new(timeout));
    let solver = Arc::new(CapMonsterSolver::from_config(&config.captcha, timeout)?);

    let mut run_loop = RunLoop::new(config, wallets, rotator, factory, solver);

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    run_menu(&mut run_loop, &mut input).await?;
    Ok(())
}

/// Env wallets first, then stored wallets not already present
fn load_wallets(config: &Config) -> anyhow::Result<Vec<Arc<dyn SignatureProvider>>> {
    let mut wallets: Vec<LocalWallet> =
        load_wallets_from_env(&config.wallets.env_prefix, std::env::vars());

    if config.wallets.include_stored_wallets {
        let store = WalletStore::new(paths::resolve(&config.wallets.store_path));
        for wallet in load_wallets_from_store(&store)? {
            let address = wallet.address();
            if !wallets.iter().any(|w| w.address() == address) {
                wallets.push(wallet);
            }
        }
    }

    Ok(wallets.into_iter().map(LocalWallet::into_provider).collect())
}
