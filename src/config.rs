use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

pub const MIN_BALANCE_ENV: &str = "BANK_ORACLE_MIN_BALANCE";
pub const MAX_BALANCE_ENV: &str = "BANK_ORACLE_MAX_BALANCE";
pub const SUCCESS_PROBABILITY_ENV: &str = "BANK_ORACLE_SUCCESS_PROBABILITY";
pub const LATENCY_MS_ENV: &str = "BANK_ORACLE_LATENCY_MS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{name}` has invalid value `{value}`")]
    InvalidValue { name: &'static str, value: String },
    #[error("Balance range is empty: min {min} is greater than max {max}")]
    EmptyBalanceRange { min: u32, max: u32 },
    #[error("Success probability must be within [0, 1], got {0}")]
    ProbabilityOutOfRange(f64),
}

/// Behaviour of [`RandomBalanceOracle`](crate::oracle::RandomBalanceOracle).
#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    /// Lowest candidate balance, inclusive.
    pub min_balance: u32,
    /// Highest candidate balance, inclusive.
    pub max_balance: u32,
    /// Chance that a fetch yields the candidate instead of nothing.
    pub success_probability: f64,
    pub latency: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            min_balance: 0,
            max_balance: 100,
            success_probability: 0.5,
            latency: Duration::ZERO,
        }
    }
}

impl OracleConfig {
    /// Defaults overridden by whichever `BANK_ORACLE_*` variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(min) = parse_var(&lookup, MIN_BALANCE_ENV)? {
            config.min_balance = min;
        }
        if let Some(max) = parse_var(&lookup, MAX_BALANCE_ENV)? {
            config.max_balance = max;
        }
        if let Some(probability) = parse_var(&lookup, SUCCESS_PROBABILITY_ENV)? {
            config.success_probability = probability;
        }
        if let Some(millis) = parse_var(&lookup, LATENCY_MS_ENV)? {
            config.latency = Duration::from_millis(millis);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_balance > self.max_balance {
            return Err(ConfigError::EmptyBalanceRange {
                min: self.min_balance,
                max: self.max_balance,
            });
        }
        if !(0.0..=1.0).contains(&self.success_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(self.success_probability));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
