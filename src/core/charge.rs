//! Simulated charging with a time limit
//!
//! No funds move: a charge waits out the gateway's simulated latency and then
//! issues a confirmation code. The timeout-bounded variant runs the charge as
//! its own tokio task and races it against a timer.
//!
//! # Cancellation
//!
//! When the timer wins, the charge task is detached rather than aborted. It may
//! still complete later, but its result is dropped; the caller only ever sees
//! the timeout.

use crate::core::traits::ChargeGateway;
use crate::types::{CardError, ConfirmationCode, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for charging
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChargeConfig {
    /// Default time limit for `charge_card_with_timeout`
    pub timeout: Duration,
    /// Simulated gateway round-trip time
    pub latency: Duration,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            latency: Duration::from_millis(100),
        }
    }
}

impl ChargeConfig {
    /// Create a new ChargeConfig with custom values
    ///
    /// A zero timeout would fail every charge, so it falls back to the default.
    pub fn new(timeout: Duration, latency: Duration) -> Self {
        let default = Self::default();

        let timeout = if timeout.is_zero() {
            warn!(
                default_ms = default.timeout.as_millis() as u64,
                "Invalid charge timeout (0ms), using default"
            );
            default.timeout
        } else {
            timeout
        };

        Self { timeout, latency }
    }
}

/// Gateway that approves every charge after a fixed delay
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway {
    latency: Duration,
}

impl SimulatedGateway {
    /// Create a gateway that takes `latency` to answer
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl ChargeGateway for SimulatedGateway {
    async fn charge(&self, _amount: Decimal) -> Result<ConfirmationCode> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(ConfirmationCode::generate())
    }
}

/// Charge service issuing confirmation codes through a gateway
#[derive(Clone)]
pub struct ChargeService {
    gateway: Arc<dyn ChargeGateway>,
}

impl ChargeService {
    /// Create a charge service over `gateway`
    pub fn new(gateway: Arc<dyn ChargeGateway>) -> Self {
        Self { gateway }
    }

    /// Create a charge service over a [`SimulatedGateway`] using `config.latency`
    pub fn simulated(config: &ChargeConfig) -> Self {
        Self::new(Arc::new(SimulatedGateway::new(config.latency)))
    }

    /// Charge `amount` and wait for the gateway however long it takes
    pub async fn charge_card(&self, amount: Decimal) -> Result<ConfirmationCode> {
        let code = self.gateway.charge(amount).await?;
        info!(%amount, "Charge approved");
        Ok(code)
    }

    /// Charge `amount`, giving up after `timeout`
    ///
    /// # Returns
    ///
    /// * `Ok(ConfirmationCode)` - If the charge finished before the timer
    /// * `Err(CardError::Timeout)` - If the timer fired first
    /// * `Err(CardError::ChargeFailed)` - If the charge task panicked
    ///
    /// Must be called from within a tokio runtime with the time driver enabled.
    pub async fn charge_card_with_timeout(
        &self,
        amount: Decimal,
        timeout: Duration,
    ) -> Result<ConfirmationCode> {
        let gateway = Arc::clone(&self.gateway);
        let task = tokio::spawn(async move { gateway.charge(amount).await });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => {
                let code = result?;
                info!(%amount, "Charge approved");
                Ok(code)
            }
            Ok(Err(join_error)) => Err(CardError::charge_failed(join_error.to_string())),
            Err(_) => {
                warn!(
                    %amount,
                    timeout_ms = timeout.as_millis() as u64,
                    "Charge timed out, discarding its result"
                );
                Err(CardError::timeout(timeout))
            }
        }
    }
}

impl std::fmt::Debug for ChargeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChargeService").finish_non_exhaustive()
    }
}
