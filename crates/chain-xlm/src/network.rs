//! Stellar network registry.
//!
//! Each network is identified by an upper-case key (`FUTURENET`, `TESTNET`,
//! `PUBLIC`) and carries its Horizon URL, Soroban RPC endpoint and the
//! passphrase whose SHA-256 is the network id mixed into every transaction
//! hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::XlmError;

pub const FUTURENET_PASSPHRASE: &str = "Test SDF Future Network ; October 2022";
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
pub const MAINNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Which network to talk to and which signing domain transactions belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDetails {
    /// Upper-case network key, e.g. `FUTURENET`.
    pub network: String,
    /// Horizon URL shown to the user and reported by wallets.
    pub network_url: String,
    pub network_passphrase: String,
    /// Soroban RPC endpoint.
    pub rpc_url: String,
}

impl NetworkDetails {
    /// Same network, different RPC endpoint.
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Network id used in transaction hashes.
    pub fn network_id(&self) -> [u8; 32] {
        network_id(&self.network_passphrase)
    }
}

/// Futurenet, the network Soroban payments were first deployed on.
pub fn futurenet() -> NetworkDetails {
    NetworkDetails {
        network: "FUTURENET".into(),
        network_url: "https://horizon-futurenet.stellar.org".into(),
        network_passphrase: FUTURENET_PASSPHRASE.into(),
        rpc_url: "https://rpc-futurenet.stellar.org/".into(),
    }
}

/// Public testnet.
pub fn testnet() -> NetworkDetails {
    NetworkDetails {
        network: "TESTNET".into(),
        network_url: "https://horizon-testnet.stellar.org".into(),
        network_passphrase: TESTNET_PASSPHRASE.into(),
        rpc_url: "https://soroban-testnet.stellar.org".into(),
    }
}

/// Public network.
pub fn mainnet() -> NetworkDetails {
    NetworkDetails {
        network: "PUBLIC".into(),
        network_url: "https://horizon.stellar.org".into(),
        network_passphrase: MAINNET_PASSPHRASE.into(),
        rpc_url: "https://soroban-rpc.mainnet.stellar.gateway.fm".into(),
    }
}

/// Look up a network by key (case-insensitive). `MAINNET` is accepted as an
/// alias of `PUBLIC`.
pub fn get_network(key: &str) -> Option<NetworkDetails> {
    match key.trim().to_ascii_uppercase().as_str() {
        "FUTURENET" => Some(futurenet()),
        "TESTNET" => Some(testnet()),
        "PUBLIC" | "MAINNET" => Some(mainnet()),
        _ => None,
    }
}

/// RPC endpoint for a network key.
pub fn rpc_url_for(key: &str) -> Result<String, XlmError> {
    get_network(key)
        .map(|n| n.rpc_url)
        .ok_or_else(|| XlmError::UnsupportedNetwork(key.to_string()))
}

/// All built-in networks.
pub fn supported_networks() -> Vec<NetworkDetails> {
    vec![futurenet(), testnet(), mainnet()]
}

/// SHA-256 of the network passphrase.
pub fn network_id(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}
