use clap::{Arg, ArgAction, Command};
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;

use blockstreetbot::{
    captcha::CapMonsterSolver,
    config,
    logger::{self as logger, LogTag},
    paths,
    proxy::load_configured_proxies,
    runner::Registrar,
    session::ReqwestTransportFactory,
    wallet::WalletStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("Wallet Manager")
        .version("1.0")
        .about("BlockStreet Bot Wallet Management Tool")
        .subcommand(
            Command::new("create")
                .about("Create, register and store new wallets")
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_name("COUNT")
                        .value_parser(clap::value_parser!(u32).range(1..))
                        .default_value("1")
                        .help("Number of wallets to create"),
                )
                .arg(
                    Arg::new("interact")
                        .long("interact")
                        .action(ArgAction::SetTrue)
                        .help("Run the onboarding interactions on each new wallet"),
                ),
        )
        .subcommand(Command::new("list").about("List stored wallets"))
        .arg_required_else_help(true)
        .get_matches();

    if let Err(e) = paths::ensure_all_directories() {
        anyhow::bail!("Failed to create required directories: {}", e);
    }
    logger::init();
    let _ = dotenv::from_path(paths::get_env_file_path());

    let config = config::load_active_config()?;
    let store = WalletStore::new(paths::resolve(&config.wallets.store_path));

    match matches.subcommand() {
        Some(("create", sub_matches)) => {
            let count = sub_matches.get_one::<u32>("count").copied().unwrap_or(1);
            let interact = sub_matches.get_flag("interact");

            let timeout = Duration::from_secs(config.platform.request_timeout_secs);
            let solver = Arc::new(CapMonsterSolver::from_config(&config.captcha, timeout)?);
            let proxies = load_configured_proxies(&config.proxy);

            println!("🔐 Creating {} wallet(s)...", count);
            let mut registrar = Registrar::new(
                config,
                Arc::new(ReqwestTransportFactory::new(timeout)),
                solver,
                proxies,
                store.clone(),
            );
            let report = registrar.run(count, interact).await?;

            for record in &report.created {
                println!("✅ {}", record.address.green());
            }
            for cycle in &report.interactions {
                println!(
                    "   Interaction: {} successful / {} failed",
                    cycle.successful(),
                    cycle.failed()
                );
            }
            println!(
                "\n{} created, {} failed. Records saved to {}",
                report.created.len(),
                report.failed,
                store.path().display()
            );
            println!("⚠️  IMPORTANT: The file holds private keys, keep it safe!");

            if report.created.is_empty() && report.failed > 0 {
                logger::flush();
                std::process::exit(1);
            }
        }

        Some(("list", _)) => {
            let records = store.load()?;
            if records.is_empty() {
                println!("No wallets found. Use 'create' to create a new wallet.");
                return Ok(());
            }

            println!("📋 {} stored wallet(s):\n", records.len());
            for (index, record) in records.iter().enumerate() {
                println!("{:>3}. {}", index + 1, record.address.bold());
                if let Some(session_id) = &record.session_id {
                    println!("     Session: {}", session_id);
                }
            }
        }

        _ => unreachable!("arg_required_else_help guards missing subcommands"),
    }

    logger::info(LogTag::Wallet, "Wallet manager finished");
    logger::flush();
    Ok(())
}
