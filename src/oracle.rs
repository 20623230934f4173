use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{ConfigError, OracleConfig};

/// External source of truth for an account balance.
///
/// `None` means the source was unavailable, which is different from a zero balance.
#[async_trait]
pub trait BalanceOracle: Send + Sync {
    async fn fetch_balance(&self) -> Option<Decimal>;
}

/// Simulated remote balance source.
///
/// Every fetch waits for the configured latency, then makes two draws: a candidate
/// balance within the configured range, and whether the fetch succeeds at all.
pub struct RandomBalanceOracle {
    config: OracleConfig,
    rng: Mutex<StdRng>,
}

impl RandomBalanceOracle {
    pub fn new(config: OracleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    /// Reproducible sequence of outcomes for the same seed and config.
    pub fn seeded(config: OracleConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    fn draw(&self) -> Option<Decimal> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let candidate = rng.random_range(self.config.min_balance..=self.config.max_balance);
        let succeeded = rng.random_bool(self.config.success_probability);
        debug!(candidate, succeeded, "balance oracle draw");
        succeeded.then(|| Decimal::from(candidate))
    }
}

impl Default for RandomBalanceOracle {
    fn default() -> Self {
        Self {
            config: OracleConfig::default(),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

#[async_trait]
impl BalanceOracle for RandomBalanceOracle {
    async fn fetch_balance(&self) -> Option<Decimal> {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
        self.draw()
    }
}

/// Oracle that always answers with the same value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticBalanceOracle(pub Option<Decimal>);

#[async_trait]
impl BalanceOracle for StaticBalanceOracle {
    async fn fetch_balance(&self) -> Option<Decimal> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config(success_probability: f64) -> OracleConfig {
        OracleConfig {
            min_balance: 10,
            max_balance: 20,
            success_probability,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn always_succeeding_oracle_stays_in_range() {
        let oracle = RandomBalanceOracle::seeded(config(1.0), 7).unwrap();
        for _ in 0..100 {
            let balance = oracle.fetch_balance().await.unwrap();
            assert!(balance >= Decimal::from(10) && balance <= Decimal::from(20));
        }
    }

    #[tokio::test]
    async fn always_failing_oracle_returns_nothing() {
        let oracle = RandomBalanceOracle::seeded(config(0.0), 7).unwrap();
        for _ in 0..100 {
            assert_eq!(oracle.fetch_balance().await, None);
        }
    }

    #[tokio::test]
    async fn coin_flip_produces_both_outcomes() {
        let oracle = RandomBalanceOracle::seeded(config(0.5), 42).unwrap();
        let mut outcomes = Vec::new();
        for _ in 0..200 {
            outcomes.push(oracle.fetch_balance().await);
        }
        assert!(outcomes.iter().any(Option::is_some));
        assert!(outcomes.iter().any(Option::is_none));
    }

    #[tokio::test]
    async fn same_seed_same_outcomes() {
        let a = RandomBalanceOracle::seeded(OracleConfig::default(), 3).unwrap();
        let b = RandomBalanceOracle::seeded(OracleConfig::default(), 3).unwrap();
        for _ in 0..20 {
            assert_eq!(a.fetch_balance().await, b.fetch_balance().await);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_completes_only_after_latency() {
        let oracle = RandomBalanceOracle::seeded(
            OracleConfig {
                latency: Duration::from_millis(1000),
                ..config(1.0)
            },
            1,
        )
        .unwrap();
        let started = tokio::time::Instant::now();
        let fetch = tokio::spawn(async move { oracle.fetch_balance().await });

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(!fetch.is_finished());

        let balance = fetch.await.unwrap();
        assert!(balance.is_some());
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = RandomBalanceOracle::new(config(2.0)).err().unwrap();
        assert_eq!(err, ConfigError::ProbabilityOutOfRange(2.0));
    }

    #[tokio::test]
    async fn static_oracle() {
        assert_eq!(
            StaticBalanceOracle(Some(Decimal::from(16))).fetch_balance().await,
            Some(Decimal::from(16))
        );
        assert_eq!(StaticBalanceOracle(None).fetch_balance().await, None);
    }
}
