/// Platform actions as values
///
/// An [`ActionRequest`] is resolved once (from menu input or by the scheduler)
/// and can then be applied to any number of sessions.
use serde_json::Value;
use std::fmt;

use crate::errors::BotError;
use crate::session::SessionClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Swap,
    Supply,
    Withdraw,
    Borrow,
    Repay,
}

impl ActionKind {
    pub const LENDING: [ActionKind; 4] = [
        ActionKind::Supply,
        ActionKind::Withdraw,
        ActionKind::Borrow,
        ActionKind::Repay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Swap => "Swap",
            ActionKind::Supply => "Supply",
            ActionKind::Withdraw => "Withdraw",
            ActionKind::Borrow => "Borrow",
            ActionKind::Repay => "Repay",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One concrete platform call; amounts are already in wire format
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    Swap {
        from: String,
        to: String,
        from_amount: String,
        to_amount: String,
    },
    Supply { symbol: String, amount: String },
    Withdraw { symbol: String, amount: String },
    Borrow { symbol: String, amount: String },
    Repay { symbol: String, amount: String },
}

impl ActionRequest {
    /// Supply/Withdraw/Borrow/Repay; `None` for `Swap`, which needs two tokens
    pub fn lending(kind: ActionKind, symbol: &str, amount: &str) -> Option<Self> {
        let (symbol, amount) = (symbol.to_string(), amount.to_string());
        match kind {
            ActionKind::Supply => Some(ActionRequest::Supply { symbol, amount }),
            ActionKind::Withdraw => Some(ActionRequest::Withdraw { symbol, amount }),
            ActionKind::Borrow => Some(ActionRequest::Borrow { symbol, amount }),
            ActionKind::Repay => Some(ActionRequest::Repay { symbol, amount }),
            ActionKind::Swap => None,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::Swap { .. } => ActionKind::Swap,
            ActionRequest::Supply { .. } => ActionKind::Supply,
            ActionRequest::Withdraw { .. } => ActionKind::Withdraw,
            ActionRequest::Borrow { .. } => ActionKind::Borrow,
            ActionRequest::Repay { .. } => ActionKind::Repay,
        }
    }

    pub async fn execute(&self, client: &mut SessionClient) -> Result<Value, BotError> {
        match self {
            ActionRequest::Swap {
                from,
                to,
                from_amount,
                to_amount,
            } => client.swap(from, to, from_amount, to_amount).await,
            ActionRequest::Supply { symbol, amount } => client.supply(symbol, amount).await,
            ActionRequest::Withdraw { symbol, amount } => client.withdraw(symbol, amount).await,
            ActionRequest::Borrow { symbol, amount } => client.borrow(symbol, amount).await,
            ActionRequest::Repay { symbol, amount } => client.repay(symbol, amount).await,
        }
    }
}

impl fmt::Display for ActionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionRequest::Swap {
                from,
                to,
                from_amount,
                to_amount,
            } => write!(f, "Swap {} {} -> {} {}", from_amount, from, to_amount, to),
            ActionRequest::Supply { symbol, amount }
            | ActionRequest::Withdraw { symbol, amount }
            | ActionRequest::Borrow { symbol, amount }
            | ActionRequest::Repay { symbol, amount } => {
                write!(f, "{} {} {}", self.kind(), amount, symbol)
            }
        }
    }
}
