use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::account::AccountId;

/// Operation names accepted in an account script.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Open,
    Deposit,
    Withdraw,
    Transfer,
    Sync,
}

/// Balance mutation requested from a single [`Account`](crate::account::Account).
///
/// Commands carry raw amounts; validation happens when the account handles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountCommand {
    Deposit { amount: Decimal },
    Withdraw { amount: Decimal },
    Transfer { amount: Decimal, target: AccountId },
}

impl AccountCommand {
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Deposit { amount }
            | Self::Withdraw { amount }
            | Self::Transfer { amount, .. } => *amount,
        }
    }
}

#[derive(Debug, Error)]
pub enum AccountCommandError {
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: OperationKind },
    #[error("Target client is required for {kind:?}")]
    TargetRequired { kind: OperationKind },
}

/// Amount column of a script row, required for every kind except `sync`.
pub fn required_amount(
    kind: OperationKind,
    amount: Option<Decimal>,
) -> Result<Decimal, AccountCommandError> {
    amount.ok_or(AccountCommandError::AmountRequired { kind })
}

pub fn required_target<T>(kind: OperationKind, target: Option<T>) -> Result<T, AccountCommandError> {
    target.ok_or(AccountCommandError::TargetRequired { kind })
}
