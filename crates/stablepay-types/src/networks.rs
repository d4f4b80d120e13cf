//! Network configuration types.
//!
//! Defines the per-network settings the backend needs to build descriptors
//! and talk to a chain: RPC endpoint, deployed contract addresses, and the
//! block explorer used in client-facing links.

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Configuration for a single blockchain network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// Human-readable network name (e.g. "base-sepolia").
	pub name: String,
	/// HTTP(S) RPC endpoint.
	pub rpc_url: String,
	/// Address of the deployed PaymentProcessor contract.
	pub payment_processor_address: Address,
	/// Address of the deployed MerchantRegistry contract.
	pub merchant_registry_address: Address,
	/// Base URL of the block explorer for this network.
	pub explorer_url: String,
}

impl NetworkConfig {
	/// Builds a block-explorer link for a transaction hash.
	pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
		format!("{}/tx/{}", self.explorer_url, tx_hash)
	}
}

/// Networks configuration mapping chain IDs to their configurations.
pub type NetworksConfig = HashMap<u64, NetworkConfig>;

/// Helper function to deserialize network configurations from TOML.
///
/// TOML tables cannot have numeric keys, so chain IDs arrive as strings and
/// are converted to u64 keys here.
pub fn deserialize_networks<'de, D>(deserializer: D) -> Result<NetworksConfig, D::Error>
where
	D: Deserializer<'de>,
{
	let string_map: HashMap<String, NetworkConfig> = HashMap::deserialize(deserializer)?;
	let mut result = HashMap::new();

	for (key, value) in string_map {
		let chain_id = key
			.parse::<u64>()
			.map_err(|e| serde::de::Error::custom(format!("Invalid chain_id '{}': {}", key, e)))?;
		result.insert(chain_id, value);
	}

	Ok(result)
}
