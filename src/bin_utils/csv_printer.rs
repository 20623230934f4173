use std::io::Write;

use crate::processor::ClientId;
use anyhow::Context;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AccountBalance {
    pub client: ClientId,
    pub balance: Decimal,
}

/// Writes one `client,balance` row per account, header first.
pub fn print_balances<W>(
    output: &mut W,
    balances: impl Iterator<Item = AccountBalance>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for balance in balances {
        let client = balance.client;
        writer
            .serialize(balance)
            .with_context(|| format!("Failed to write balance of client {client} to CSV"))?;
    }
    writer.flush().context("Failed to flush CSV writer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_header_and_rows() {
        let mut output = Vec::new();
        print_balances(
            &mut output,
            [
                AccountBalance {
                    client: 1,
                    balance: Decimal::new(1050, 2),
                },
                AccountBalance {
                    client: 2,
                    balance: Decimal::from(-3),
                },
            ]
            .into_iter(),
        )
        .unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec!["client,balance", "1,10.50", "2,-3"]
        );
    }

    #[test]
    fn nothing_printed_without_accounts() {
        let mut output = Vec::new();
        print_balances(&mut output, std::iter::empty()).unwrap();
        assert!(output.is_empty());
    }
}
