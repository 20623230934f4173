use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::Arc,
};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    account::Account,
    command::{AccountCommand, OperationKind, required_amount, required_target},
    oracle::BalanceOracle,
};

use super::{AccountProcessor, ClientId, OperationProcessError};

/// Accounts keyed by client, all synchronizing against one shared oracle.
pub struct InMemoryAccountProcessor {
    oracle: Arc<dyn BalanceOracle>,
    pub accounts: BTreeMap<ClientId, Account>,
}

impl InMemoryAccountProcessor {
    pub fn new(oracle: Arc<dyn BalanceOracle>) -> Self {
        Self {
            oracle,
            accounts: BTreeMap::new(),
        }
    }

    fn account(&self, client: ClientId) -> Result<&Account, OperationProcessError> {
        self.accounts
            .get(&client)
            .ok_or(OperationProcessError::UnknownAccount { client })
    }

    fn account_mut(&mut self, client: ClientId) -> Result<&mut Account, OperationProcessError> {
        self.accounts
            .get_mut(&client)
            .ok_or(OperationProcessError::UnknownAccount { client })
    }

    fn open(&mut self, client: ClientId, initial: Decimal) -> Result<(), OperationProcessError> {
        match self.accounts.entry(client) {
            Entry::Occupied(_) => Err(OperationProcessError::DuplicateAccount { client }),
            Entry::Vacant(entry) => {
                entry.insert(Account::with_oracle(initial, self.oracle.clone()));
                Ok(())
            }
        }
    }

    fn transfer(
        &mut self,
        client: ClientId,
        amount: Decimal,
        target_client: ClientId,
    ) -> Result<(), OperationProcessError> {
        let source = self.account(client)?;
        let source_id = source.id();
        let target = self.account(target_client)?.id();
        let evt = source.handle_command(&AccountCommand::Transfer { amount, target })?;
        if let Some(credit) = evt.counterpart(source_id) {
            let target = self.account_mut(target_client)?;
            target.ensure_credit(credit.amount())?;
            target.apply(&credit);
        }
        self.account_mut(client)?.apply(&evt);
        Ok(())
    }
}

#[async_trait]
impl AccountProcessor for InMemoryAccountProcessor {
    async fn process_operation(
        &mut self,
        client_id: ClientId,
        kind: OperationKind,
        amount: Option<Decimal>,
        target: Option<ClientId>,
    ) -> Result<(), OperationProcessError> {
        match kind {
            OperationKind::Open => self.open(client_id, required_amount(kind, amount)?),
            OperationKind::Deposit => {
                let amount = required_amount(kind, amount)?;
                Ok(self.account_mut(client_id)?.deposit(amount)?)
            }
            OperationKind::Withdraw => {
                let amount = required_amount(kind, amount)?;
                Ok(self.account_mut(client_id)?.withdraw(amount)?)
            }
            OperationKind::Transfer => {
                let amount = required_amount(kind, amount)?;
                let target = required_target(kind, target)?;
                self.transfer(client_id, amount, target)
            }
            OperationKind::Sync => Ok(self
                .account_mut(client_id)?
                .synchronize_balance()
                .await?),
        }
    }
}
