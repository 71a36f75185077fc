//! Set-fees action: update a lock bridge's fee parameters.
//!
//! Owner-only on-chain; this tool just submits the call to one bridge
//! deployment at a time, so L1 and L2 are updated with two invocations.

use crate::Action;
use alloy_primitives::{utils::format_ether, Address, U256};
use alloy_provider::Provider;
use binding::bridge::ILockBridge;
use tracing::info;

/// Basis-points denominator used by the bridge contracts.
const MAX_BPS: u64 = 10_000;

/// Input for a set-fees action.
#[derive(Debug, Clone)]
pub struct SetFees {
    /// Lock bridge contract address
    pub bridge: Address,
    /// Fixed fee per transfer, in wei
    pub fixed_fee: U256,
    /// Percentage fee in basis points (20 = 0.2%)
    pub percent_fee_bps: u64,
    /// Gas cost markup in basis points (2000 = 20%)
    pub gas_markup_bps: u64,
}

/// Action to update bridge fee parameters.
pub struct SetFeesAction<P> {
    provider: P,
    action: SetFees,
}

impl<P> SetFeesAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, action: SetFees) -> Self {
        Self { provider, action }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.bridge == Address::ZERO {
            eyre::bail!("Bridge address must not be zero");
        }

        if self.action.percent_fee_bps > MAX_BPS {
            eyre::bail!(
                "Percent fee {} bps exceeds {} bps",
                self.action.percent_fee_bps,
                MAX_BPS
            );
        }

        Ok(())
    }
}

impl<P> Action for SetFeesAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        Ok(self.validate().is_ok())
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        // The bridge exposes no fee getters in its public surface; updates
        // are driven unconditionally.
        Ok(false)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        info!(
            bridge = %self.action.bridge,
            fixed_fee = %self.action.fixed_fee,
            percent_fee_bps = self.action.percent_fee_bps,
            gas_markup_bps = self.action.gas_markup_bps,
            "Updating bridge fees"
        );

        let contract = ILockBridge::new(self.action.bridge, &self.provider);
        let pending = contract
            .setFees(
                self.action.fixed_fee,
                U256::from(self.action.percent_fee_bps),
                U256::from(self.action.gas_markup_bps),
            )
            .send()
            .await?;

        let tx_hash = *pending.tx_hash();
        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            eyre::bail!("setFees transaction {} reverted (not the owner?)", tx_hash);
        }

        Ok(crate::Result {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: Some(U256::from(receipt.gas_used)),
        })
    }

    fn description(&self) -> String {
        format!(
            "Setting fees on bridge {}: fixed {} ETH, {} bps, gas markup {} bps",
            self.action.bridge,
            format_ether(self.action.fixed_fee),
            self.action.percent_fee_bps,
            self.action.gas_markup_bps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;
    use alloy_primitives::address;

    fn sample_set_fees() -> SetFees {
        SetFees {
            bridge: address!("1111111111111111111111111111111111111111"),
            fixed_fee: U256::from(2_000_000_000_000_000u64), // 0.002 ETH
            percent_fee_bps: 20,
            gas_markup_bps: 2_000,
        }
    }

    #[test]
    fn test_validate_ok() {
        let action = SetFeesAction::new(MockProvider, sample_set_fees());
        assert!(action.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_bridge() {
        let mut fees = sample_set_fees();
        fees.bridge = Address::ZERO;

        let action = SetFeesAction::new(MockProvider, fees);
        assert!(action.validate().is_err());
    }

    #[test]
    fn test_validate_percent_fee_out_of_range() {
        let mut fees = sample_set_fees();
        fees.percent_fee_bps = 10_001;

        let action = SetFeesAction::new(MockProvider, fees);
        let result = action.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Percent fee"));
    }

    #[test]
    fn test_description() {
        let action = SetFeesAction::new(MockProvider, sample_set_fees());
        let desc = action.description();

        assert!(desc.contains("Setting fees"));
        assert!(desc.contains("0.002"));
        assert!(desc.contains("20 bps"));
    }
}
