//! Network configuration for cross-chain actions.
//!
//! Provides chain ids and default endpoints for the different networks
//! (mainnet, testnet). Contract addresses are deployment-specific and live
//! in the [`crate::addresses`] module instead.

use serde::{Deserialize, Serialize};

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

/// L1 (Ethereum) network configuration.
#[derive(Debug, Clone, Serialize)]
pub struct L1Config {
    /// Chain ID
    pub chain_id: u64,
    /// Default public RPC endpoint
    pub rpc_url: &'static str,
    /// Block time in seconds (12 for Ethereum)
    pub block_time_secs: u64,
}

impl L1Config {
    /// Ethereum mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 1,
            rpc_url: "https://ethereum-rpc.publicnode.com",
            block_time_secs: 12,
        }
    }

    /// Ethereum Sepolia testnet configuration.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
            block_time_secs: 12,
        }
    }
}

/// L2 network configuration.
#[derive(Debug, Clone, Serialize)]
pub struct L2Config {
    /// Chain ID
    pub chain_id: u64,
    /// Default public RPC endpoint
    pub rpc_url: &'static str,
    /// Bridge History API base URL (serves claim proofs)
    pub bridge_history_api_url: &'static str,
    /// Block time in seconds
    pub block_time_secs: u64,
}

impl L2Config {
    /// L2 mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 534352,
            rpc_url: "https://rpc.scroll.io",
            bridge_history_api_url: "https://mainnet-api-bridge-v2.scroll.io",
            block_time_secs: 3,
        }
    }

    /// L2 Sepolia testnet configuration.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 534351,
            rpc_url: "https://sepolia-rpc.scroll.io",
            bridge_history_api_url: "https://sepolia-api-bridge-v2.scroll.io",
            block_time_secs: 3,
        }
    }
}

/// Complete network configuration for cross-chain actions.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Ethereum/L1 configuration
    pub l1: L1Config,
    /// L2 configuration
    pub l2: L2Config,
}

impl NetworkConfig {
    /// Create mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            l1: L1Config::mainnet(),
            l2: L2Config::mainnet(),
        }
    }

    /// Create testnet (Sepolia) configuration.
    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            l1: L1Config::sepolia(),
            l2: L2Config::sepolia(),
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::sepolia(),
        }
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    network_type: NetworkType,
    l1: L1Config,
    l2: L2Config,
}

impl NetworkConfigBuilder {
    /// Start with mainnet defaults.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            l1: L1Config::mainnet(),
            l2: L2Config::mainnet(),
        }
    }

    /// Start with testnet defaults.
    pub const fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            l1: L1Config::sepolia(),
            l2: L2Config::sepolia(),
        }
    }

    /// Override the Bridge History API endpoint.
    pub const fn bridge_history_api_url(mut self, url: &'static str) -> Self {
        self.l2.bridge_history_api_url = url;
        self
    }

    /// Override the L1 RPC endpoint.
    pub const fn l1_rpc_url(mut self, url: &'static str) -> Self {
        self.l1.rpc_url = url;
        self
    }

    /// Override the L2 RPC endpoint.
    pub const fn l2_rpc_url(mut self, url: &'static str) -> Self {
        self.l2.rpc_url = url;
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> NetworkConfig {
        NetworkConfig {
            network_type: self.network_type,
            l1: self.l1,
            l2: self.l2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_config() {
        let config = NetworkConfig::mainnet();
        assert_eq!(config.l1.chain_id, 1);
        assert_eq!(config.l2.chain_id, 534352);
        assert_eq!(config.network_type, NetworkType::Mainnet);
    }

    #[test]
    fn test_sepolia_config() {
        let config = NetworkConfig::sepolia();
        assert_eq!(config.l1.chain_id, 11155111);
        assert_eq!(config.l2.chain_id, 534351);
        assert_eq!(config.network_type, NetworkType::Testnet);
    }

    #[test]
    fn test_custom_config_builder() {
        let config = NetworkConfigBuilder::testnet()
            .bridge_history_api_url("http://bridge-history-api.local")
            .build();

        assert_eq!(
            config.l2.bridge_history_api_url,
            "http://bridge-history-api.local"
        );
        assert_eq!(config.network_type, NetworkType::Testnet);
    }
}
