use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    command::AccountCommand,
    oracle::{BalanceOracle, RandomBalanceOracle},
};

static NEXT_ACCOUNT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an [`Account`] instance, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(u64);

impl AccountId {
    fn next() -> Self {
        Self(NEXT_ACCOUNT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountEventKind {
    Deposited,
    Withdrawn,
    TransferredOut { target: AccountId },
    TransferredIn { source: AccountId },
    Synchronized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
}

impl AccountEvent {
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> AccountEventKind {
        self.kind
    }

    /// Credit the target side of a transfer has to apply.
    pub fn counterpart(&self, source: AccountId) -> Option<AccountEvent> {
        match self.kind {
            AccountEventKind::TransferredOut { .. } => Some(AccountEvent {
                amount: self.amount,
                kind: AccountEventKind::TransferredIn { source },
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Invalid amount {amount}: must be a positive number")]
    InvalidInput { amount: Decimal },
    #[error("Insufficient funds: cannot withdraw more than {balance}")]
    InsufficientFunds { balance: Decimal },
    #[error("Transfer failed")]
    TransferFailed,
    #[error("Synchronization failed")]
    SynchronizationFailed,
    #[error("Balance overflow: cannot add {amount} to {balance}")]
    BalanceOverflow { balance: Decimal, amount: Decimal },
}

/// In-memory balance holder.
///
/// Mutations go through [`Account::handle_command`], which only validates, and
/// [`Account::apply`], which only mutates. A failed command never touches the balance.
pub struct Account {
    id: AccountId,
    balance: Decimal,
    oracle: Arc<dyn BalanceOracle>,
}

impl Account {
    /// Account backed by a [`RandomBalanceOracle`] with default settings.
    pub fn new(initial_balance: Decimal) -> Self {
        Self::with_oracle(initial_balance, Arc::new(RandomBalanceOracle::default()))
    }

    pub fn with_oracle(initial_balance: Decimal, oracle: Arc<dyn BalanceOracle>) -> Self {
        Self {
            id: AccountId::next(),
            balance: initial_balance,
            oracle,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        let evt = self.handle_command(&AccountCommand::Deposit { amount })?;
        self.apply(&evt);
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), AccountError> {
        let evt = self.handle_command(&AccountCommand::Withdraw { amount })?;
        self.apply(&evt);
        Ok(())
    }

    pub fn transfer(&mut self, amount: Decimal, target: &mut Account) -> Result<(), AccountError> {
        let evt = self.handle_command(&AccountCommand::Transfer {
            amount,
            target: target.id,
        })?;
        if let Some(credit) = evt.counterpart(self.id) {
            target.ensure_credit(credit.amount)?;
            target.apply(&credit);
        }
        self.apply(&evt);
        Ok(())
    }

    pub fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Deposited | AccountEventKind::TransferredIn { .. } => {
                self.balance += event.amount;
            }
            AccountEventKind::Withdrawn | AccountEventKind::TransferredOut { .. } => {
                self.balance -= event.amount;
            }
            AccountEventKind::Synchronized => {
                self.balance = event.amount;
            }
        }
        debug!(account = %self.id, kind = ?event.kind, amount = %event.amount, balance = %self.balance, "applied account event");
    }

    pub fn handle_command(&self, command: &AccountCommand) -> Result<AccountEvent, AccountError> {
        // self transfer is rejected before the amount is even looked at
        if let AccountCommand::Transfer { target, .. } = command
            && *target == self.id
        {
            return Err(AccountError::TransferFailed);
        }

        let amount = command.amount();
        if amount <= Decimal::zero() {
            return Err(AccountError::InvalidInput { amount });
        }

        match *command {
            AccountCommand::Deposit { .. } => {
                self.ensure_credit(amount)?;
                Ok(AccountEvent {
                    amount,
                    kind: AccountEventKind::Deposited,
                })
            }
            AccountCommand::Withdraw { .. } => {
                self.ensure_funds(amount)?;
                Ok(AccountEvent {
                    amount,
                    kind: AccountEventKind::Withdrawn,
                })
            }
            AccountCommand::Transfer { target, .. } => {
                self.ensure_funds(amount)?;
                Ok(AccountEvent {
                    amount,
                    kind: AccountEventKind::TransferredOut { target },
                })
            }
        }
    }

    fn ensure_funds(&self, amount: Decimal) -> Result<(), AccountError> {
        if amount > self.balance {
            Err(AccountError::InsufficientFunds {
                balance: self.balance,
            })
        } else {
            Ok(())
        }
    }

    /// Fails when crediting `amount` would exceed what a [`Decimal`] can hold.
    pub fn ensure_credit(&self, amount: Decimal) -> Result<(), AccountError> {
        match self.balance.checked_add(amount) {
            Some(_) => Ok(()),
            None => Err(AccountError::BalanceOverflow {
                balance: self.balance,
                amount,
            }),
        }
    }

    /// Asks the balance oracle for the externally known balance.
    pub async fn fetch_balance(&self) -> Option<Decimal> {
        self.oracle.fetch_balance().await
    }

    /// Replaces the balance with the oracle's answer, or fails leaving it untouched.
    pub async fn synchronize_balance(&mut self) -> Result<(), AccountError> {
        let Some(balance) = self.fetch_balance().await else {
            warn!(account = %self.id, "balance oracle returned no value");
            return Err(AccountError::SynchronizationFailed);
        };
        self.apply(&AccountEvent {
            amount: balance,
            kind: AccountEventKind::Synchronized,
        });
        Ok(())
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Account {}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("balance", &self.balance)
            .finish_non_exhaustive()
    }
}
