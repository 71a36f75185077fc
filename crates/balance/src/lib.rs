//! Balance monitoring for blockchain accounts and contracts.
//!
//! This crate provides high-level interfaces for querying balances from
//! blockchain providers, with specific support for the bridged ERC20 token
//! and the bridge escrow contracts on both chains.

pub mod monitor;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Represents a blockchain balance at a specific point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The address holding the balance
    pub holder: Address,
    /// The asset address (zero address for native token)
    pub asset: Address,
    /// The balance amount
    pub amount: U256,
}

/// Type of balance query to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceQuery {
    /// Query ERC20 token balance for an EOA or contract
    Erc20Balance {
        /// Token contract address
        token: Address,
        /// Holder address
        holder: Address,
    },
    /// Query native ETH balance
    NativeBalance {
        /// Account address
        address: Address,
    },
}

impl BalanceQuery {
    /// Balance of `holder` in the given asset, where the zero address means
    /// native ETH. This is the convention the claim workflow uses for its
    /// before/after snapshots.
    pub fn for_asset(asset: Address, holder: Address) -> Self {
        if asset == Address::ZERO {
            Self::NativeBalance { address: holder }
        } else {
            Self::Erc20Balance {
                token: asset,
                holder,
            }
        }
    }
}

/// Trait for monitoring balances on a blockchain.
pub trait Monitor: Send + Sync {
    /// Query a single balance.
    fn query_balance(
        &self,
        query: BalanceQuery,
    ) -> impl Future<Output = eyre::Result<Balance>> + Send;
}
