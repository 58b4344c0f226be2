//! Batch driver
//!
//! A batch starts with [`RunLoop::prepare_batch`] (captcha, setup sign-in,
//! check-in, catalog) and then runs either one resolved action on every
//! wallet ([`RunLoop::run_single_action`]) or full scheduler cycles on every
//! wallet, forever, once per day ([`RunLoop::run_daily`]).
//!
//! Wallets are processed strictly one after another. A wallet whose sign-in
//! fails is skipped; the batch goes on.

pub mod countdown;
pub mod interactive;
pub mod menu;
pub mod registration;

use std::sync::Arc;

use crate::captcha::CaptchaSolver;
use crate::config::Config;
use crate::errors::BotError;
use crate::logger::{self, LogTag};
use crate::proxy::ProxyRotator;
use crate::scheduler::{
    sleep_ms, ActionOutcome, ActionRequest, ActionScheduler, BatchReport, CycleReport,
    OutcomeStatus, WalletReport,
};
use crate::session::{SessionClient, TokenDescriptor, TransportFactory};
use crate::wallet::{short_address, SignatureProvider};

pub use countdown::{countdown, format_countdown};
pub use interactive::run_menu;
pub use menu::{parse_cycle_count, parse_menu_choice, select_token, MenuChoice};
pub use registration::{Registrar, RegistrationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    /// Signing in wallet `i` (0-based)
    Authenticating(usize),
    /// Running actions for wallet `i`
    Cycling(usize),
    /// Waiting for the next daily pass
    Sleeping,
}

/// Per-batch state produced by the setup step
#[derive(Debug, Clone)]
pub struct BatchContext {
    pub captcha_token: String,
    pub tokens: Vec<TokenDescriptor>,
}

pub struct RunLoop {
    config: Config,
    wallets: Vec<Arc<dyn SignatureProvider>>,
    rotator: ProxyRotator,
    factory: Arc<dyn TransportFactory>,
    captcha: Arc<dyn CaptchaSolver>,
    scheduler: ActionScheduler,
    phase: RunPhase,
}

impl RunLoop {
    pub fn new(
        config: Config,
        wallets: Vec<Arc<dyn SignatureProvider>>,
        rotator: ProxyRotator,
        factory: Arc<dyn TransportFactory>,
        captcha: Arc<dyn CaptchaSolver>,
    ) -> Self {
        let scheduler = ActionScheduler::new(config.scheduler.clone());
        Self {
            config,
            wallets,
            rotator,
            factory,
            captcha,
            scheduler,
            phase: RunPhase::Idle,
        }
    }

    pub fn with_scheduler(mut self, scheduler: ActionScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn wallet_count(&self) -> usize {
        self.wallets.len()
    }

    fn set_phase(&mut self, phase: RunPhase) {
        if self.phase != phase {
            logger::debug(
                LogTag::Runner,
                &format!("Phase {:?} -> {:?}", self.phase, phase),
            );
            self.phase = phase;
        }
    }

    fn connect(
        &self,
        wallet: &Arc<dyn SignatureProvider>,
        proxy: Option<String>,
    ) -> Result<SessionClient, BotError> {
        SessionClient::connect(
            wallet.clone(),
            self.config.platform.clone(),
            self.factory.as_ref(),
            proxy,
        )
    }

    // =========================================================================
    // BATCH SETUP
    // =========================================================================

    /// Solve the captcha, sign in the first wallet and fetch the token catalog
    ///
    /// Any error here ends the batch attempt.
    pub async fn prepare_batch(&mut self) -> Result<BatchContext, BotError> {
        let first = self
            .wallets
            .first()
            .cloned()
            .ok_or_else(|| BotError::config("No wallets loaded"))?;

        let platform = &self.config.platform;
        let captcha_token = self
            .captcha
            .solve(&platform.turnstile_site_key, &platform.captcha_page_url)
            .await?;

        self.rotator.reset();
        let mut client = self.connect(&first, self.rotator.first())?;

        self.set_phase(RunPhase::Authenticating(0));
        let login = client.login(Some(&captcha_token)).await;
        self.set_phase(RunPhase::Idle);
        login?;
        logger::info(LogTag::Runner, "Initial login successful");

        if self.config.runner.share_on_setup {
            match client.share().await {
                Ok(_) => logger::info(LogTag::Runner, "Daily share complete"),
                Err(e) => logger::warning(
                    LogTag::Runner,
                    &format!("Daily share failed or skipped: {}", e.cause()),
                ),
            }
        }

        match client.earn_info().await {
            Ok(info) => logger::info(
                LogTag::Runner,
                &format!("Earn Balance: {:.4}", info.balance),
            ),
            Err(e) => logger::warning(
                LogTag::Runner,
                &format!("Could not fetch earn info: {}", e.cause()),
            ),
        }

        match client.supplies().await {
            Ok(supplies) => {
                let positions: Vec<String> = supplies
                    .iter()
                    .filter(|s| !s.symbol.is_empty() && s.amount > 0.0)
                    .map(|s| format!("{}: {:.4}", s.symbol, s.amount))
                    .collect();
                if !positions.is_empty() {
                    logger::info(
                        LogTag::Runner,
                        &format!("Supplied Assets: {}", positions.join(", ")),
                    );
                }
            }
            Err(e) => logger::warning(
                LogTag::Runner,
                &format!("Could not fetch supplied assets: {}", e.cause()),
            ),
        }

        let tokens = client.token_list().await?;
        if tokens.is_empty() {
            logger::warning(LogTag::Runner, "Token catalog is empty");
        } else {
            logger::info(
                LogTag::Runner,
                &format!("Token list fetched: {} tokens", tokens.len()),
            );
        }

        Ok(BatchContext {
            captcha_token,
            tokens,
        })
    }

    /// Sign in wallet `index` through `report.proxy`; `None` means skip the
    /// wallet (the reason is stored in `report.login_error`)
    async fn sign_in(
        &mut self,
        index: usize,
        report: &mut WalletReport,
        captcha_token: &str,
    ) -> Option<SessionClient> {
        let wallet = self.wallets[index].clone();
        self.set_phase(RunPhase::Authenticating(index));

        let mut client = match self.connect(&wallet, report.proxy.clone()) {
            Ok(client) => client,
            Err(e) => {
                logger::error(
                    LogTag::Runner,
                    &format!("Could not set up session for {}: {}", report.address, e.cause()),
                );
                report.login_error = Some(e.cause().to_string());
                return None;
            }
        };

        match client.login(Some(captcha_token)).await {
            Ok(_) => {
                logger::info(
                    LogTag::Runner,
                    &format!("Wallet {} logged in successfully", report.address),
                );
                Some(client)
            }
            Err(e) => {
                logger::error(
                    LogTag::Runner,
                    &format!("Login failed for wallet {}: {}. Skipping.", report.address, e.cause()),
                );
                report.login_error = Some(e.cause().to_string());
                None
            }
        }
    }

    // =========================================================================
    // SINGLE-ACTION MODE
    // =========================================================================

    /// Apply `request` `transactions` times on every wallet, then stop
    pub async fn run_single_action(
        &mut self,
        context: &BatchContext,
        request: &ActionRequest,
        transactions: u32,
    ) -> BatchReport {
        let mut batch = BatchReport::default();
        let total = self.wallets.len();
        self.rotator.reset();

        for index in 0..total {
            let address = self.wallets[index].address();
            let proxy = self.rotator.next();
            logger::info(
                LogTag::Runner,
                &format!("Processing wallet {}/{}: {}", index + 1, total, address),
            );

            let mut report = WalletReport::new(address, proxy);
            if let Some(mut client) = self.sign_in(index, &mut report, &context.captcha_token).await {
                self.set_phase(RunPhase::Cycling(index));
                for n in 1..=transactions {
                    logger::info(
                        LogTag::Runner,
                        &format!("--- Running transaction {} of {} ---", n, transactions),
                    );
                    let status = match request.execute(&mut client).await {
                        Ok(_) => {
                            logger::info(LogTag::Runner, &format!("   {} successful", request));
                            OutcomeStatus::Success
                        }
                        Err(e) => {
                            logger::error(
                                LogTag::Runner,
                                &format!("   {} failed: {}", request.kind(), e.cause()),
                            );
                            OutcomeStatus::Failed(e.cause().to_string())
                        }
                    };
                    report.cycles.push(CycleReport {
                        cycle: n,
                        swaps_skipped: false,
                        outcomes: vec![ActionOutcome {
                            kind: request.kind(),
                            description: request.to_string(),
                            status,
                        }],
                    });
                    sleep_ms(self.config.runner.transaction_delay_ms).await;
                }
            }

            batch.wallets.push(report);
            if index + 1 < total {
                sleep_ms(self.config.runner.wallet_delay_ms).await;
            }
        }

        self.set_phase(RunPhase::Idle);
        log_batch_summary(&batch);
        batch
    }

    // =========================================================================
    // DAILY MODE
    // =========================================================================

    /// One pass of `cycles` scheduler cycles over every wallet
    pub async fn run_daily_pass(&mut self, context: &BatchContext, cycles: u32) -> BatchReport {
        let mut batch = BatchReport::default();
        let total = self.wallets.len();
        self.rotator.reset();

        for index in 0..total {
            let address = self.wallets[index].address();
            let proxy = self.rotator.next();
            logger::info(
                LogTag::Runner,
                &format!(
                    "--- Processing Wallet {}/{}: {} ---",
                    index + 1,
                    total,
                    address
                ),
            );

            let mut report = WalletReport::new(address, proxy);
            let Some(mut client) = self.sign_in(index, &mut report, &context.captcha_token).await else {
                batch.wallets.push(report);
                continue;
            };

            self.set_phase(RunPhase::Cycling(index));
            report.cycles = self
                .scheduler
                .run_cycles(&mut client, &context.tokens, cycles)
                .await;
            logger::info(
                LogTag::Runner,
                &format!(
                    "All cycles completed for wallet {} ({} successful, {} failed)",
                    short_address(&report.address),
                    report.successful(),
                    report.failed()
                ),
            );
            batch.wallets.push(report);

            if index + 1 < total {
                sleep_ms(self.config.runner.daily_wallet_delay_ms).await;
            }
        }

        self.set_phase(RunPhase::Idle);
        log_batch_summary(&batch);
        batch
    }

    /// Daily passes forever, sleeping `daily_interval_secs` in between
    pub async fn run_daily(&mut self, context: &BatchContext, cycles: u32) {
        logger::info(
            LogTag::Runner,
            &format!("Will run {} cycle(s) per wallet", cycles),
        );
        loop {
            self.run_daily_pass(context, cycles).await;
            logger::info(LogTag::Runner, "Daily run completed for all wallets");

            self.set_phase(RunPhase::Sleeping);
            countdown(self.config.runner.daily_interval_secs).await;
        }
    }
}

fn log_batch_summary(batch: &BatchReport) {
    logger::info(LogTag::Runner, &format!("Batch summary: {}", batch.summary_line()));
    for wallet in &batch.wallets {
        let line = match &wallet.login_error {
            Some(reason) => format!("  {} skipped: {}", short_address(&wallet.address), reason),
            None => format!(
                "  {}: {} successful / {} failed",
                short_address(&wallet.address),
                wallet.successful(),
                wallet.failed()
            ),
        };
        logger::info(LogTag::Runner, &line);
    }
}
