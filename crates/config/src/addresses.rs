//! Deployment address book.
//!
//! The bridge deployment writes an `addresses.json` file with the contract
//! addresses of both bridge pairs (the ETH bridge and the custom-token
//! bridge) on both chains. Every tool reads its targets from that file
//! instead of hardcoding addresses.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AddressBookError {
    #[error("failed to read address book: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse address book: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Contract addresses on a single chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainAddresses {
    /// Lock-bridge contract address
    pub bridge: Address,
    /// Bridged ERC20 token address (absent for the ETH bridge)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Address>,
}

/// One bridge pair: the L1 deployment and its L2 counterpart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeDeployment {
    pub l1: ChainAddresses,
    pub l2: ChainAddresses,
}

/// The full address book as written by the deployment scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressBook {
    /// Native ETH bridge pair
    pub eth: BridgeDeployment,
    /// Custom ERC20 token bridge pair
    pub token: BridgeDeployment,
}

impl AddressBook {
    /// Load the address book from an `addresses.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AddressBookError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse the address book from a JSON string.
    pub fn from_json(contents: &str) -> Result<Self, AddressBookError> {
        Ok(serde_json::from_str(contents)?)
    }
}
