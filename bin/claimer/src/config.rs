use action::claim::DEFAULT_CLAIM_GAS_LIMIT;
use alloy_primitives::Address;
use ::config::{NetworkConfig, NetworkType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Destination-side execution budget for bridge transfers.
const DEFAULT_BRIDGE_GAS_LIMIT: u64 = 1_000_000;

/// Seconds between watcher scans for new and pending withdrawals.
const DEFAULT_WATCH_INTERVAL_SECS: u64 = 30;

/// Top-level claimer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network to operate on (mainnet or testnet)
    pub network: NetworkType,

    /// L1 RPC endpoint url
    pub l1_rpc_url: String,

    /// L2 RPC endpoint url
    pub l2_rpc_url: String,

    /// Bridge History API base URL (defaults to the network's endpoint)
    #[serde(default)]
    pub bridge_history_api_url: Option<String>,

    /// Path to the addresses.json written by the bridge deployment
    #[serde(default = "default_addresses_path")]
    pub addresses_path: String,

    /// EOA address that claims and bridges
    pub eoa_address: Address,

    /// Fixed gas limit for relay transactions
    #[serde(default)]
    pub claim_gas_limit: Option<u64>,

    /// Destination-chain gas budget for bridge transfers
    #[serde(default)]
    pub bridge_gas_limit: Option<u64>,

    /// Directory for the watcher's processed/pending state files
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Seconds between watcher scans
    #[serde(default)]
    pub watch_interval_secs: Option<u64>,

    /// Dry-run mode: log actions without executing transactions
    #[serde(default)]
    pub dry_run: bool,
}

fn default_addresses_path() -> String {
    "addresses.json".to_string()
}

fn default_state_dir() -> String {
    ".".to_string()
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Static network parameters for the configured network.
    pub const fn network_config(&self) -> NetworkConfig {
        NetworkConfig::from_network_type(self.network)
    }

    /// Bridge History API base URL, with the config override applied.
    pub fn history_api_url(&self) -> String {
        self.bridge_history_api_url
            .clone()
            .unwrap_or_else(|| self.network_config().l2.bridge_history_api_url.to_string())
    }

    /// Gas limit for relay transactions.
    pub fn claim_gas_limit(&self) -> u64 {
        self.claim_gas_limit.unwrap_or(DEFAULT_CLAIM_GAS_LIMIT)
    }

    /// Gas budget for bridge transfers.
    pub fn bridge_gas_limit(&self) -> u64 {
        self.bridge_gas_limit.unwrap_or(DEFAULT_BRIDGE_GAS_LIMIT)
    }

    /// Directory holding the watcher's state files.
    pub fn state_dir(&self) -> &str {
        &self.state_dir
    }

    /// Seconds between watcher scans.
    pub fn watch_interval_secs(&self) -> u64 {
        self.watch_interval_secs
            .unwrap_or(DEFAULT_WATCH_INTERVAL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(
            r#"
                network = "testnet"
                l1_rpc_url = "https://ethereum-sepolia-rpc.publicnode.com"
                l2_rpc_url = "https://sepolia-rpc.scroll.io"
                eoa_address = "0x5CFFA347b0aE99cc01E5c01714cA5658e54a23D1"
            "#,
        )
        .unwrap();

        assert_eq!(config.network, NetworkType::Testnet);
        assert_eq!(config.addresses_path, "addresses.json");
        assert_eq!(config.claim_gas_limit(), DEFAULT_CLAIM_GAS_LIMIT);
        assert_eq!(config.bridge_gas_limit(), DEFAULT_BRIDGE_GAS_LIMIT);
        assert_eq!(config.state_dir(), ".");
        assert_eq!(config.watch_interval_secs(), DEFAULT_WATCH_INTERVAL_SECS);
        assert!(!config.dry_run);
        assert_eq!(
            config.history_api_url(),
            "https://sepolia-api-bridge-v2.scroll.io"
        );
    }

    #[test]
    fn test_history_api_override() {
        let config: Config = toml::from_str(
            r#"
                network = "testnet"
                l1_rpc_url = "http://localhost:8545"
                l2_rpc_url = "http://localhost:8546"
                bridge_history_api_url = "http://bridge-history-api.local"
                eoa_address = "0x5CFFA347b0aE99cc01E5c01714cA5658e54a23D1"
                claim_gas_limit = 3000000
            "#,
        )
        .unwrap();

        assert_eq!(config.history_api_url(), "http://bridge-history-api.local");
        assert_eq!(config.claim_gas_limit(), 3_000_000);
    }
}
