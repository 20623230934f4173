//! Bootstraps [`bank_account`](crate) for the binary: reads an operation script,
//! drives the accounts and prints the resulting balances.

use std::{
    io::{Read, Write},
    sync::Arc,
};

use crate::{
    oracle::BalanceOracle,
    processor::{
        AccountProcessor, OperationProcessError, in_memory_processor::InMemoryAccountProcessor,
    },
};
use anyhow::Result;
use csv_parser::CsvOperationParser;
use csv_printer::{AccountBalance, print_balances};
use tracing::info;
pub mod csv_parser;
pub mod csv_printer;

/// Why a single script row was not applied.
#[derive(Debug)]
pub enum RowError {
    Parse(csv::Error),
    Process(OperationProcessError),
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub oracle: Arc<dyn BalanceOracle>,
    pub error_printer: Box<dyn FnMut(u64, RowError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub async fn run(mut self) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);

        let mut processor = InMemoryAccountProcessor::new(self.oracle);
        let mut rows = 0usize;
        let mut failed = 0usize;

        for (line, row) in parser {
            rows += 1;
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    failed += 1;
                    (self.error_printer)(line, RowError::Parse(err));
                    continue;
                }
            };
            if let Err(err) = processor
                .process_operation(row.client, row.kind, row.amount, row.target)
                .await
            {
                failed += 1;
                (self.error_printer)(line, RowError::Process(err));
            }
        }
        info!(rows, failed, accounts = processor.accounts.len(), "operation script processed");

        print_balances(
            self.output,
            processor
                .accounts
                .iter()
                .map(|(client_id, acc)| AccountBalance {
                    client: *client_id,
                    balance: acc.balance(),
                }),
        )
    }
}
