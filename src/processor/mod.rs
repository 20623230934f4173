use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::AccountError,
    command::{AccountCommandError, OperationKind},
};

pub mod in_memory_processor;

#[derive(Debug, Error)]
pub enum OperationProcessError {
    #[error(transparent)]
    CommandErr(#[from] AccountCommandError),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
    #[error("Client {client} has no account")]
    UnknownAccount { client: ClientId },
    #[error("Client {client} already has an account")]
    DuplicateAccount { client: ClientId },
}

pub type ClientId = u16;

#[async_trait]
pub trait AccountProcessor {
    async fn process_operation(
        &mut self,
        client_id: ClientId,
        kind: OperationKind,
        amount: Option<Decimal>,
        target: Option<ClientId>,
    ) -> Result<(), OperationProcessError>;
}
