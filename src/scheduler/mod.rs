//! Per-wallet action scheduling
//!
//! One cycle is: read supplied positions, run the swap phase when something
//! is supplied, then the lending phase (supply, withdraw, borrow, repay).
//! Every executed action is followed by a jittered pause. A failing action
//! is logged and recorded, never propagated.

pub mod actions;
pub mod onboarding;
pub mod pacing;
pub mod pricing;
pub mod report;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SchedulerConfig;
use crate::logger::{self, LogTag};
use crate::session::{SessionClient, SuppliedAsset, TokenDescriptor};

pub use actions::{ActionKind, ActionRequest};
pub use pacing::{sleep_ms, DelayConfig};
pub use pricing::{compute_to_amount, format_amount, random_amount};
pub use report::{ActionOutcome, BatchReport, CycleReport, OutcomeStatus, WalletReport};

/// Why a swap attempt produced no request
#[derive(Debug, Clone, PartialEq)]
pub enum SwapSkip {
    NoOwnedPositions,
    SourceNotInCatalog(String),
    NoDistinctDestination(String),
}

impl std::fmt::Display for SwapSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapSkip::NoOwnedPositions => write!(f, "no supplied assets to swap from"),
            SwapSkip::SourceNotInCatalog(symbol) => {
                write!(f, "{} is not in the token catalog", symbol)
            }
            SwapSkip::NoDistinctDestination(symbol) => {
                write!(f, "no catalog token other than {} to swap into", symbol)
            }
        }
    }
}

pub struct ActionScheduler {
    config: SchedulerConfig,
    delay: DelayConfig,
    rng: StdRng,
}

impl ActionScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible token/amount/delay choices
    pub fn with_seed(config: SchedulerConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SchedulerConfig, rng: StdRng) -> Self {
        let delay = DelayConfig::random(config.action_delay_min_ms, config.action_delay_max_ms);
        Self { config, delay, rng }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run `cycles` full cycles on an authenticated session
    pub async fn run_cycles(
        &mut self,
        client: &mut SessionClient,
        tokens: &[TokenDescriptor],
        cycles: u32,
    ) -> Vec<CycleReport> {
        let mut reports = Vec::with_capacity(cycles as usize);
        for cycle in 1..=cycles {
            logger::info(
                LogTag::Scheduler,
                &format!("--- Starting Transaction Cycle {} of {} ---", cycle, cycles),
            );
            reports.push(self.run_cycle(client, tokens, cycle).await);
        }
        reports
    }

    pub async fn run_cycle(
        &mut self,
        client: &mut SessionClient,
        tokens: &[TokenDescriptor],
        cycle: u32,
    ) -> CycleReport {
        let mut report = CycleReport {
            cycle,
            ..Default::default()
        };

        let supplies = if self.config.fetch_supplies {
            match client.supplies().await {
                Ok(supplies) => supplies,
                Err(e) => {
                    logger::error(
                        LogTag::Scheduler,
                        &format!("Could not fetch supplies: {}", e.cause()),
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let owned = owned_positions(&supplies);
        if owned.is_empty() {
            logger::warning(
                LogTag::Scheduler,
                "No supplied assets found to swap from. Skipping swaps.",
            );
            report.swaps_skipped = true;
        } else {
            logger::info(
                LogTag::Scheduler,
                &format!("Executing {} swaps...", self.config.swap_count),
            );
            for n in 1..=self.config.swap_count {
                match self.plan_swap(&owned, tokens) {
                    Ok(request) => {
                        let outcome = self.execute(client, request, n).await;
                        report.outcomes.push(outcome);
                    }
                    Err(skip) => {
                        logger::warning(
                            LogTag::Scheduler,
                            &format!("Swap #{} skipped: {}", n, skip),
                        );
                        report.outcomes.push(ActionOutcome {
                            kind: ActionKind::Swap,
                            description: format!("Swap #{}", n),
                            status: OutcomeStatus::Skipped(skip.to_string()),
                        });
                    }
                }
            }
        }

        for kind in ActionKind::LENDING {
            let count = self.lending_count(kind);
            if count == 0 {
                continue;
            }
            logger::info(
                LogTag::Scheduler,
                &format!("Executing {} {}(s)...", count, kind),
            );
            for n in 1..=count {
                match self.plan_lending(kind, tokens) {
                    Some(request) => {
                        let outcome = self.execute(client, request, n).await;
                        report.outcomes.push(outcome);
                    }
                    None => {
                        logger::warning(
                            LogTag::Scheduler,
                            &format!("{} #{} skipped: token catalog is empty", kind, n),
                        );
                        report.outcomes.push(ActionOutcome {
                            kind,
                            description: format!("{} #{}", kind, n),
                            status: OutcomeStatus::Skipped("token catalog is empty".to_string()),
                        });
                    }
                }
            }
        }

        logger::debug(
            LogTag::Scheduler,
            &format!(
                "Cycle {} done: {} successful, {} failed",
                cycle,
                report.successful(),
                report.failed()
            ),
        );
        report
    }

    fn lending_count(&self, kind: ActionKind) -> u32 {
        match kind {
            ActionKind::Supply => self.config.supply_count,
            ActionKind::Withdraw => self.config.withdraw_count,
            ActionKind::Borrow => self.config.borrow_count,
            ActionKind::Repay => self.config.repay_count,
            ActionKind::Swap => self.config.swap_count,
        }
    }

    /// Random owned source, random distinct destination, priced through the catalog
    pub fn plan_swap(
        &mut self,
        owned: &[SuppliedAsset],
        tokens: &[TokenDescriptor],
    ) -> Result<ActionRequest, SwapSkip> {
        let source = owned
            .choose(&mut self.rng)
            .ok_or(SwapSkip::NoOwnedPositions)?;

        let from = tokens
            .iter()
            .find(|t| t.symbol == source.symbol)
            .ok_or_else(|| SwapSkip::SourceNotInCatalog(source.symbol.clone()))?;

        let destinations: Vec<&TokenDescriptor> =
            tokens.iter().filter(|t| t.symbol != from.symbol).collect();
        let to = destinations
            .choose(&mut self.rng)
            .ok_or_else(|| SwapSkip::NoDistinctDestination(from.symbol.clone()))?;

        let from_amount = random_amount(&mut self.rng, self.config.amount_min, self.config.amount_max);
        let to_amount = compute_to_amount(from_amount, from.price, to.price);

        Ok(ActionRequest::Swap {
            from: from.symbol.clone(),
            to: to.symbol.clone(),
            from_amount: format_amount(from_amount),
            to_amount: format_amount(to_amount),
        })
    }

    pub fn plan_lending(&mut self, kind: ActionKind, tokens: &[TokenDescriptor]) -> Option<ActionRequest> {
        let token = tokens.choose(&mut self.rng)?;
        let amount = random_amount(&mut self.rng, self.config.amount_min, self.config.amount_max);
        ActionRequest::lending(kind, &token.symbol, &format_amount(amount))
    }

    async fn execute(
        &mut self,
        client: &mut SessionClient,
        request: ActionRequest,
        n: u32,
    ) -> ActionOutcome {
        let kind = request.kind();
        let description = request.to_string();

        let status = match request.execute(client).await {
            Ok(_) => {
                logger::info(
                    LogTag::Scheduler,
                    &format!("{} #{}: {} successful", kind, n, description),
                );
                OutcomeStatus::Success
            }
            Err(e) => {
                logger::error(
                    LogTag::Scheduler,
                    &format!("{} #{} failed: {}", kind, n, e.cause()),
                );
                OutcomeStatus::Failed(e.cause().to_string())
            }
        };

        self.delay.wait(&mut self.rng).await;

        ActionOutcome {
            kind,
            description,
            status,
        }
    }
}

/// Positions with a symbol and a positive amount
pub fn owned_positions(supplies: &[SuppliedAsset]) -> Vec<SuppliedAsset> {
    supplies
        .iter()
        .filter(|s| !s.symbol.is_empty() && s.amount > 0.0)
        .cloned()
        .collect()
}
