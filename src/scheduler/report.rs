//! Outcome reporting for cycles, wallets and batches

use super::actions::ActionKind;

#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    Success,
    Failed(String),
    /// Not attempted (no usable tokens); no request was sent
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    /// Human-readable action, e.g. `Supply 0.00120000 BSD`
    pub description: String,
    pub status: OutcomeStatus,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed(_))
    }
}

/// One transaction cycle of one wallet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// 1-based
    pub cycle: u32,
    /// No positive supplied balance, swap phase not run
    pub swaps_skipped: bool,
    pub outcomes: Vec<ActionOutcome>,
}

impl CycleReport {
    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn count_kind(&self, kind: ActionKind) -> usize {
        self.outcomes.iter().filter(|o| o.kind == kind).count()
    }
}

/// Everything one wallet did during a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletReport {
    pub address: String,
    pub proxy: Option<String>,
    /// Set when the wallet was skipped because sign-in failed
    pub login_error: Option<String>,
    pub cycles: Vec<CycleReport>,
}

impl WalletReport {
    pub fn new(address: String, proxy: Option<String>) -> Self {
        Self {
            address,
            proxy,
            ..Default::default()
        }
    }

    pub fn logged_in(&self) -> bool {
        self.login_error.is_none()
    }

    pub fn successful(&self) -> usize {
        self.cycles.iter().map(|c| c.successful()).sum()
    }

    pub fn failed(&self) -> usize {
        self.cycles.iter().map(|c| c.failed()).sum()
    }
}

/// Summary of one pass over every wallet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub wallets: Vec<WalletReport>,
}

impl BatchReport {
    pub fn total_wallets(&self) -> usize {
        self.wallets.len()
    }

    pub fn wallets_logged_in(&self) -> usize {
        self.wallets.iter().filter(|w| w.logged_in()).count()
    }

    pub fn successful(&self) -> usize {
        self.wallets.iter().map(|w| w.successful()).sum()
    }

    pub fn failed(&self) -> usize {
        self.wallets.iter().map(|w| w.failed()).sum()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{}/{} wallets signed in, {} successful / {} failed operations",
            self.wallets_logged_in(),
            self.total_wallets(),
            self.successful(),
            self.failed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(kind: ActionKind, status: OutcomeStatus) -> ActionOutcome {
        ActionOutcome {
            kind,
            description: kind.to_string(),
            status,
        }
    }

    #[test]
    fn test_counts_roll_up() {
        let cycle = CycleReport {
            cycle: 1,
            swaps_skipped: false,
            outcomes: vec![
                outcome(ActionKind::Swap, OutcomeStatus::Success),
                outcome(ActionKind::Swap, OutcomeStatus::Skipped("no catalog entry".into())),
                outcome(ActionKind::Supply, OutcomeStatus::Failed("500".into())),
                outcome(ActionKind::Repay, OutcomeStatus::Success),
            ],
        };
        assert_eq!(cycle.successful(), 2);
        assert_eq!(cycle.failed(), 1);
        assert_eq!(cycle.count_kind(ActionKind::Swap), 2);

        let mut wallet = WalletReport::new("0xabc".into(), None);
        wallet.cycles = vec![cycle.clone(), cycle];

        let mut skipped = WalletReport::new("0xdef".into(), None);
        skipped.login_error = Some("Sign verify failed".into());

        let batch = BatchReport {
            wallets: vec![wallet, skipped],
        };
        assert_eq!(batch.successful(), 4);
        assert_eq!(batch.failed(), 2);
        assert_eq!(
            batch.summary_line(),
            "1/2 wallets signed in, 4 successful / 2 failed operations"
        );
    }
}
