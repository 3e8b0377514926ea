//! Client and network configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use aligned_primitives::Address;

/// Batcher address used when none is configured
pub const DEFAULT_BATCHER_ADDRESS: &str = "ws://localhost:8080";

/// Protocol version this client speaks
pub const PROTOCOL_VERSION: u16 = 0;

/// Base URL of the batch explorer
pub const EXPLORER_URL: &str = "https://explorer.alignedlayer.com";

/// Batcher connection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatcherConfig {
    /// WebSocket address of the batcher (e.g., "ws://localhost:8080")
    pub address: String,
    /// Version the batcher must announce in its handshake
    pub protocol_version: u16,
    /// Upper bound on the whole receive phase; `None` waits indefinitely
    pub response_timeout: Option<Duration>,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_BATCHER_ADDRESS.to_string(),
            protocol_version: PROTOCOL_VERSION,
            response_timeout: None,
        }
    }
}

impl BatcherConfig {
    /// Config for a batcher at `address` with default settings
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Config for a batcher running on localhost
    pub fn local(port: u16) -> Self {
        Self::new(format!("ws://127.0.0.1:{}", port))
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    pub fn with_protocol_version(mut self, version: u16) -> Self {
        self.protocol_version = version;
        self
    }
}

/// `0x1613beB3B2C4f22Ee086B2b38C1476A3cE7f78E8`
const DEVNET_SERVICE_MANAGER: Address = Address([
    0x16, 0x13, 0xbe, 0xb3, 0xb2, 0xc4, 0xf2, 0x2e, 0xe0, 0x86,
    0xb2, 0xb3, 0x8c, 0x14, 0x76, 0xa3, 0xce, 0x7f, 0x78, 0xe8,
]);

/// `0x58F280BeBE9B34c9939C3C39e0890C81f163B623`
const HOLESKY_SERVICE_MANAGER: Address = Address([
    0x58, 0xf2, 0x80, 0xbe, 0xbe, 0x9b, 0x34, 0xc9, 0x93, 0x9c,
    0x3c, 0x39, 0xe0, 0x89, 0x0c, 0x81, 0xf1, 0x63, 0xb6, 0x23,
]);

/// Network hosting the service manager contract that attests batch roots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    Devnet,
    #[default]
    Holesky,
}

impl Network {
    /// Service manager contract address on this network
    pub fn contract_address(&self) -> Address {
        match self {
            Network::Devnet => DEVNET_SERVICE_MANAGER,
            Network::Holesky => HOLESKY_SERVICE_MANAGER,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Holesky => "holesky",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            "holesky" => Ok(Network::Holesky),
            other => Err(format!("unknown network '{}'", other)),
        }
    }
}

/// Ethereum JSON-RPC configuration for on-chain inclusion checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnchainConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    pub network: Network,
}

impl Default for OnchainConfig {
    fn default() -> Self {
        Self::holesky()
    }
}

impl OnchainConfig {
    /// Local devnet node
    pub fn devnet() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            network: Network::Devnet,
        }
    }

    pub fn holesky() -> Self {
        Self {
            rpc_url: "https://ethereum-holesky-rpc.publicnode.com".to_string(),
            network: Network::Holesky,
        }
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batcher_config_default() {
        let config = BatcherConfig::default();
        assert_eq!(config.address, DEFAULT_BATCHER_ADDRESS);
        assert_eq!(config.protocol_version, PROTOCOL_VERSION);
        assert!(config.response_timeout.is_none());
    }

    #[test]
    fn test_batcher_config_local() {
        let config = BatcherConfig::local(9000).with_response_timeout(Duration::from_secs(5));
        assert_eq!(config.address, "ws://127.0.0.1:9000");
        assert_eq!(config.response_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_contract_addresses() {
        assert_eq!(
            Network::Devnet.contract_address().to_hex(),
            "0x1613beb3b2c4f22ee086b2b38c1476a3ce7f78e8"
        );
        assert_eq!(
            Network::Holesky.contract_address().to_hex(),
            "0x58f280bebe9b34c9939c3c39e0890c81f163b623"
        );

        let parsed: Address = "0x1613beB3B2C4f22Ee086B2b38C1476A3cE7f78E8".parse().unwrap();
        assert_eq!(parsed, Network::Devnet.contract_address());
        let parsed: Address = "0x58F280BeBE9B34c9939C3C39e0890C81f163B623".parse().unwrap();
        assert_eq!(parsed, Network::Holesky.contract_address());
        assert_ne!(Network::Devnet.contract_address(), Address::zero());
    }

    #[test]
    fn test_network_parse() {
        assert_eq!("Holesky".parse::<Network>().unwrap(), Network::Holesky);
        assert_eq!("devnet".parse::<Network>().unwrap(), Network::Devnet);
        assert!("mainnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_onchain_config() {
        let config = OnchainConfig::devnet().with_rpc_url("http://10.0.0.1:8545");
        assert_eq!(config.network, Network::Devnet);
        assert_eq!(config.rpc_url, "http://10.0.0.1:8545");
        assert_eq!(OnchainConfig::default().network, Network::Holesky);
    }
}
