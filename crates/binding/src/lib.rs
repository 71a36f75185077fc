//! Contract bindings for all external contracts.
//!
//! This crate consolidates all Solidity contract interfaces used across the project:
//! - L1 messenger contract (cross-chain message relay with Merkle proof)
//! - Lock-bridge contracts deployed on both chains
//! - ERC20 tokens
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod bridge;
pub mod messenger;
pub mod token;
