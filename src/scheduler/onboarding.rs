//! First-session interaction for freshly registered wallets
//!
//! Unlike a regular cycle, every step here is gated on what the account
//! actually holds: swaps go from BSD into borrowable (`type == "B"`) tokens
//! only when enough BSD is available, repayments only target open borrows
//! that cover the amount, and withdrawals need at least one supplied BSD.

use rand::seq::SliceRandom;

use super::{
    compute_to_amount, format_amount, random_amount, ActionKind, ActionOutcome, ActionRequest,
    ActionScheduler, CycleReport, OutcomeStatus,
};
use crate::errors::BotError;
use crate::logger::{self, LogTag};
use crate::session::{AccountAsset, BorrowPosition, SessionClient, SuppliedAsset, TokenDescriptor};

/// Platform base asset
pub const BASE_SYMBOL: &str = "BSD";
/// Token/market `type` marking borrowable assets
pub const BORROWABLE_KIND: &str = "B";
/// Fixed BSD amount for the onboarding supply and withdraw
pub const BASE_UNIT: f64 = 1.0;

fn or_empty<T>(result: Result<Vec<T>, BotError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        logger::warning(
            LogTag::Scheduler,
            &format!("Could not fetch {}: {}", what, e.cause()),
        );
        Vec::new()
    })
}

/// Available BSD according to `/account/assets`
pub fn base_available(assets: &[AccountAsset]) -> f64 {
    assets
        .iter()
        .find(|a| a.symbol == BASE_SYMBOL)
        .map(|a| a.available_amount)
        .unwrap_or(0.0)
}

/// Total BSD across `/my/supply` entries
pub fn base_supplied(supplies: &[SuppliedAsset]) -> f64 {
    supplies
        .iter()
        .filter(|s| s.symbol == BASE_SYMBOL)
        .map(|s| s.amount)
        .sum()
}

fn skipped(kind: ActionKind, reason: &str) -> ActionOutcome {
    logger::warning(
        LogTag::Scheduler,
        &format!("{} skipped: {}", kind, reason),
    );
    ActionOutcome {
        kind,
        description: kind.to_string(),
        status: OutcomeStatus::Skipped(reason.to_string()),
    }
}

impl ActionScheduler {
    /// Swap, supply, borrow, repay and withdraw once each, as far as the
    /// account's balances allow
    pub async fn run_onboarding(&mut self, client: &mut SessionClient) -> CycleReport {
        let mut report = CycleReport {
            cycle: 1,
            ..Default::default()
        };

        let assets = or_empty(client.account_assets().await, "account assets");
        for asset in &assets {
            logger::info(
                LogTag::Scheduler,
                &format!(
                    "{}: Total {}, Available {}, Frozen {}",
                    asset.symbol, asset.total_amount, asset.available_amount, asset.frozen_amount
                ),
            );
        }
        let available = base_available(&assets);

        let tokens = or_empty(client.token_list().await, "token list");
        match self.plan_base_swap(&tokens, available) {
            Ok(request) => {
                let outcome = self.execute(client, request, 1).await;
                report.outcomes.push(outcome);
            }
            Err(reason) => {
                report.swaps_skipped = true;
                report.outcomes.push(skipped(ActionKind::Swap, &reason));
            }
        }

        if available >= BASE_UNIT {
            let request = self.base_unit_request(ActionKind::Supply);
            report.outcomes.push(self.execute(client, request, 1).await);
        } else {
            report
                .outcomes
                .push(skipped(ActionKind::Supply, "not enough BSD available"));
        }

        let markets = or_empty(client.market_borrow().await, "borrow markets");
        match self.plan_borrow(&markets) {
            Some(request) => report.outcomes.push(self.execute(client, request, 1).await),
            None => report
                .outcomes
                .push(skipped(ActionKind::Borrow, "no borrowable market")),
        }

        let borrows = or_empty(client.my_borrow().await, "open borrows");
        match self.plan_repay(&borrows) {
            Ok(request) => report.outcomes.push(self.execute(client, request, 1).await),
            Err(reason) => report.outcomes.push(skipped(ActionKind::Repay, &reason)),
        }

        let supplies = or_empty(client.supplies().await, "supplied assets");
        if base_supplied(&supplies) >= BASE_UNIT {
            let request = self.base_unit_request(ActionKind::Withdraw);
            report.outcomes.push(self.execute(client, request, 1).await);
        } else {
            report
                .outcomes
                .push(skipped(ActionKind::Withdraw, "not enough BSD supplied"));
        }

        report
    }

    /// BSD into a random borrowable token, if `available` covers the amount
    pub fn plan_base_swap(
        &mut self,
        tokens: &[TokenDescriptor],
        available: f64,
    ) -> Result<ActionRequest, String> {
        let base = tokens
            .iter()
            .find(|t| t.symbol == BASE_SYMBOL)
            .ok_or_else(|| format!("{} is not in the token catalog", BASE_SYMBOL))?;
        let targets: Vec<&TokenDescriptor> = tokens
            .iter()
            .filter(|t| t.kind == BORROWABLE_KIND && t.symbol != BASE_SYMBOL)
            .collect();
        let to = targets
            .choose(&mut self.rng)
            .ok_or("no borrowable token to swap into")?;

        let from_amount = random_amount(&mut self.rng, self.config.amount_min, self.config.amount_max);
        if available < from_amount {
            return Err("not enough BSD for swap".to_string());
        }

        Ok(ActionRequest::Swap {
            from: base.symbol.clone(),
            to: to.symbol.clone(),
            from_amount: format_amount(from_amount),
            to_amount: format_amount(compute_to_amount(from_amount, base.price, to.price)),
        })
    }

    pub fn plan_borrow(&mut self, markets: &[BorrowPosition]) -> Option<ActionRequest> {
        let borrowable: Vec<&BorrowPosition> = markets
            .iter()
            .filter(|m| m.kind == BORROWABLE_KIND && !m.symbol.is_empty())
            .collect();
        let market = borrowable.choose(&mut self.rng)?;
        let amount = random_amount(&mut self.rng, self.config.amount_min, self.config.amount_max);
        ActionRequest::lending(ActionKind::Borrow, &market.symbol, &format_amount(amount))
    }

    /// Repay part of a random open borrow that covers the drawn amount
    pub fn plan_repay(&mut self, borrows: &[BorrowPosition]) -> Result<ActionRequest, String> {
        let open: Vec<&BorrowPosition> = borrows
            .iter()
            .filter(|b| !b.symbol.is_empty() && b.amount > 0.0)
            .collect();
        let position = open.choose(&mut self.rng).ok_or("no open borrow")?;

        let amount = random_amount(&mut self.rng, self.config.amount_min, self.config.amount_max);
        if position.amount < amount {
            return Err(format!("{} borrow is below the repay amount", position.symbol));
        }
        ActionRequest::lending(ActionKind::Repay, &position.symbol, &format_amount(amount))
            .ok_or_else(|| "repay is not a lending action".to_string())
    }

    fn base_unit_request(&self, kind: ActionKind) -> ActionRequest {
        match kind {
            ActionKind::Withdraw => ActionRequest::Withdraw {
                symbol: BASE_SYMBOL.to_string(),
                amount: format_amount(BASE_UNIT),
            },
            _ => ActionRequest::Supply {
                symbol: BASE_SYMBOL.to_string(),
                amount: format_amount(BASE_UNIT),
            },
        }
    }
}
