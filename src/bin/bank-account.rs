use std::{fs::File, sync::Arc};

use anyhow::{Context, Result};
use bank_account::{
    bin_utils::{RowError, Service},
    config::OracleConfig,
    oracle::RandomBalanceOracle,
};
use tracing_subscriber::EnvFilter;

const SEED_ENV: &str = "BANK_ORACLE_SEED";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let filename = std::env::args()
        .nth(1)
        .context("Expected a file name as the first argument")?;
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let config = OracleConfig::from_env().context("Invalid balance oracle configuration")?;
    let oracle = match std::env::var(SEED_ENV) {
        Ok(seed) => {
            let seed = seed
                .trim()
                .parse()
                .with_context(|| format!("`{SEED_ENV}` must be an unsigned integer"))?;
            RandomBalanceOracle::seeded(config, seed)?
        }
        Err(_) => RandomBalanceOracle::new(config)?,
    };

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        oracle: Arc::new(oracle),
        error_printer: Box::new(|line, err| match err {
            RowError::Parse(err) => eprintln!("Error at line {line}: {err}"),
            RowError::Process(err) => eprintln!("Rejected at line {line}: {err}"),
        }),
    };
    service.run().await
}
