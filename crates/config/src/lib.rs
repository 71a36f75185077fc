//! Configuration types for the bridge claim tooling.
//!
//! This crate provides:
//! - Network configurations (mainnet, testnet)
//! - Chain ids and default endpoints for both chains
//! - The deployment address book written by the bridge deployment scripts

pub mod addresses;
pub mod network;

pub use addresses::{AddressBook, AddressBookError, BridgeDeployment, ChainAddresses};
pub use network::{L1Config, L2Config, NetworkConfig, NetworkConfigBuilder, NetworkType};
