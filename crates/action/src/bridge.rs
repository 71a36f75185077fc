//! Bridge action: move tokens or ETH to the other chain.
//!
//! Locks value in the source-side lock bridge, which sends the cross-chain
//! message releasing it on the destination side. For ERC20 transfers the
//! bridge must first be approved to pull the tokens. Transfers towards L1
//! additionally require a claim once the message is finalized.

use crate::Action;
use alloy_primitives::{
    utils::format_ether,
    Address, U256,
};
use alloy_provider::Provider;
use binding::{bridge::ILockBridge, token::IERC20};
use tracing::info;

/// Direction of a bridge transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeDirection {
    L1ToL2,
    L2ToL1,
}

impl BridgeDirection {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::L1ToL2 => "L1 -> L2",
            Self::L2ToL1 => "L2 -> L1",
        }
    }
}

/// Input for a bridge transfer.
#[derive(Debug, Clone)]
pub struct Bridge {
    /// Source-side lock bridge contract address
    pub bridge: Address,
    /// Account funding the transfer
    pub sender: Address,
    /// Bridged token address; `None` bridges native ETH
    pub token: Option<Address>,
    /// Amount to bridge, in wei
    pub amount: U256,
    /// Execution gas budget on the destination chain
    pub gas_limit: u64,
    /// Transfer direction (reporting only; the bridge address decides)
    pub direction: BridgeDirection,
}

/// Action to bridge value to the other chain.
pub struct BridgeAction<P> {
    provider: P,
    action: Bridge,
}

impl<P> BridgeAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, action: Bridge) -> Self {
        Self { provider, action }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.bridge == Address::ZERO {
            eyre::bail!("Bridge address must not be zero");
        }

        if self.action.amount == U256::ZERO {
            eyre::bail!("Amount must not be zero");
        }

        Ok(())
    }

    /// Cross-chain execution fee attached to the lock transaction.
    ///
    /// The bridge charges `gasPrice * gasLimit` up front to pay for the
    /// destination-side execution.
    async fn message_fee(&self) -> eyre::Result<(U256, U256)> {
        let gas_price = self.provider.get_gas_price().await?;
        let gas_price = U256::from(gas_price);
        let fee = gas_price * U256::from(self.action.gas_limit);
        Ok((gas_price, fee))
    }

    /// Approve the bridge to pull the token amount, if the current
    /// allowance is insufficient.
    async fn ensure_allowance(&self, token: Address) -> eyre::Result<()> {
        let erc20 = IERC20::new(token, &self.provider);

        let current = erc20
            .allowance(self.action.sender, self.action.bridge)
            .call()
            .await?;
        if current >= self.action.amount {
            return Ok(());
        }

        info!(
            token = %token,
            bridge = %self.action.bridge,
            amount = %self.action.amount,
            "Approving bridge to spend tokens"
        );

        let pending = erc20
            .approve(self.action.bridge, self.action.amount)
            .send()
            .await?;
        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            eyre::bail!("Approve transaction reverted");
        }

        Ok(())
    }
}

impl<P> Action for BridgeAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.action.amount == U256::ZERO || self.action.bridge == Address::ZERO {
            return Ok(false);
        }

        match self.action.token {
            Some(token) => {
                let erc20 = IERC20::new(token, &self.provider);
                let balance = erc20.balanceOf(self.action.sender).call().await?;
                Ok(balance >= self.action.amount)
            }
            None => {
                let (_, fee) = self.message_fee().await?;
                let balance = self.provider.get_balance(self.action.sender).await?;
                Ok(balance >= self.action.amount + fee)
            }
        }
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        // Bridge transfers are not idempotent; each invocation is a new
        // transfer and completion is tracked by the caller.
        Ok(false)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        if !self.is_ready().await? {
            eyre::bail!(
                "Insufficient balance to bridge {} (amount + message fee)",
                format_ether(self.action.amount)
            );
        }

        let (gas_price, fee) = self.message_fee().await?;
        let contract = ILockBridge::new(self.action.bridge, &self.provider);

        let pending = match self.action.token {
            Some(token) => {
                self.ensure_allowance(token).await?;

                info!(
                    bridge = %self.action.bridge,
                    token = %token,
                    amount = %self.action.amount,
                    fee = %fee,
                    "Bridging tokens"
                );

                contract
                    .bridgeToken(self.action.amount, U256::from(self.action.gas_limit))
                    .value(fee)
                    .send()
                    .await?
            }
            None => {
                info!(
                    bridge = %self.action.bridge,
                    amount = %self.action.amount,
                    fee = %fee,
                    "Bridging ETH"
                );

                contract
                    .bridgeETH(U256::from(self.action.gas_limit), gas_price)
                    .value(self.action.amount + fee)
                    .send()
                    .await?
            }
        };

        let tx_hash = *pending.tx_hash();
        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            eyre::bail!("Bridge transaction {} reverted", tx_hash);
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            direction = self.action.direction.as_str(),
            "Bridge transfer submitted; funds release on the destination chain"
        );

        Ok(crate::Result {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: Some(U256::from(receipt.gas_used)),
        })
    }

    fn description(&self) -> String {
        let asset = self
            .action
            .token
            .map_or_else(|| "ETH".to_string(), |t| format!("token {}", t));
        format!(
            "Bridging {} {} {}",
            format_ether(self.action.amount),
            asset,
            self.action.direction.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;
    use alloy_primitives::address;

    fn sample_bridge(token: Option<Address>) -> Bridge {
        Bridge {
            bridge: address!("1111111111111111111111111111111111111111"),
            sender: address!("2222222222222222222222222222222222222222"),
            token,
            amount: U256::from(1_000_000_000_000_000_000u128),
            gas_limit: 1_000_000,
            direction: BridgeDirection::L2ToL1,
        }
    }

    #[test]
    fn test_validate_ok() {
        let action = BridgeAction::new(MockProvider, sample_bridge(None));
        assert!(action.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_bridge() {
        let mut bridge = sample_bridge(None);
        bridge.bridge = Address::ZERO;

        let action = BridgeAction::new(MockProvider, bridge);
        let result = action.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Bridge address"));
    }

    #[test]
    fn test_validate_zero_amount() {
        let mut bridge = sample_bridge(None);
        bridge.amount = U256::ZERO;

        let action = BridgeAction::new(MockProvider, bridge);
        let result = action.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Amount"));
    }

    #[test]
    fn test_description_eth() {
        let action = BridgeAction::new(MockProvider, sample_bridge(None));
        let desc = action.description();

        assert!(desc.contains("Bridging 1."));
        assert!(desc.contains("ETH"));
        assert!(desc.contains("L2 -> L1"));
    }

    #[test]
    fn test_description_token() {
        let token = address!("3333333333333333333333333333333333333333");
        let action = BridgeAction::new(MockProvider, sample_bridge(Some(token)));
        let desc = action.description();

        assert!(desc.contains("token"));
        assert!(desc
            .to_lowercase()
            .contains("0x3333333333333333333333333333333333333333"));
    }
}
