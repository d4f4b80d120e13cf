//! Configuration module for the stablepay system.
//!
//! Provides structures and utilities for managing backend configuration.
//! Configuration is loaded from TOML files, supports `${VAR}` /
//! `${VAR:-default}` environment-variable interpolation, and is validated
//! to ensure all required values are properly set before any service is
//! constructed.

use serde::{Deserialize, Serialize};
use stablepay_types::{deserialize_networks, NetworkConfig, NetworksConfig, SecretString};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the stablepay backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this service instance.
	pub service: ServiceConfig,
	/// Network and contract configurations, keyed by chain id.
	#[serde(deserialize_with = "deserialize_networks")]
	pub networks: NetworksConfig,
	/// Chain selection and receipt polling settings.
	pub chain: ChainConfig,
	/// Platform signer settings.
	pub signer: SignerConfig,
	/// Storage backend settings.
	pub storage: StorageConfig,
	/// HTTP API server settings.
	#[serde(default)]
	pub api: ApiConfig,
}

/// Configuration specific to this service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Unique identifier for this backend instance, used in logs.
	pub id: String,
}

/// Chain selection and receipt polling settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
	/// Chain id of the network this instance operates on.
	/// Must match a key in the networks table.
	pub active: u64,
	/// Maximum seconds to wait for a platform-signed transaction's receipt.
	#[serde(default = "default_receipt_timeout_seconds")]
	pub receipt_timeout_seconds: u64,
}

fn default_receipt_timeout_seconds() -> u64 {
	120
}

/// Platform signer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignerConfig {
	/// Private key used to sign platform-initiated transactions.
	/// Typically supplied via `${DEPLOYER_PRIVATE_KEY}`.
	pub private_key: SecretString,
}

/// Storage backend settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which backend to use: "memory" or "file".
	pub backend: String,
	/// Base directory for the file backend.
	#[serde(default = "default_storage_path")]
	pub path: String,
	/// Interval in seconds for cleaning up expired storage entries.
	#[serde(default = "default_cleanup_interval_seconds")]
	pub cleanup_interval_seconds: u64,
}

fn default_storage_path() -> String {
	"./data/storage".to_string()
}

fn default_cleanup_interval_seconds() -> u64 {
	3600
}

/// HTTP API server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_api_host(),
			port: default_api_port(),
		}
	}
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	8080
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable
/// VAR_NAME. Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			}
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file with environment variable resolution.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let raw = tokio::fs::read_to_string(path).await?;
		raw.parse()
	}

	/// Returns the configuration of the active network.
	///
	/// Validation guarantees the active chain id exists, so this never
	/// fails after a successful load.
	pub fn active_network(&self) -> &NetworkConfig {
		&self.networks[&self.chain.active]
	}

	/// Validates the configuration to ensure all required fields are
	/// properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
		}

		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"Networks configuration cannot be empty".into(),
			));
		}
		for (chain_id, network) in &self.networks {
			if network.rpc_url.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network {} must have rpc_url",
					chain_id
				)));
			}
			if network.explorer_url.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network {} must have explorer_url",
					chain_id
				)));
			}
		}

		if !self.networks.contains_key(&self.chain.active) {
			return Err(ConfigError::Validation(format!(
				"Active chain {} not found in networks configuration",
				self.chain.active
			)));
		}
		if self.chain.receipt_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"receipt_timeout_seconds must be greater than 0".into(),
			));
		}

		if self.signer.private_key.is_empty() {
			return Err(ConfigError::Validation(
				"Signer private key cannot be empty".into(),
			));
		}

		match self.storage.backend.as_str() {
			"memory" | "file" => {}
			other => {
				return Err(ConfigError::Validation(format!(
					"Unknown storage backend '{}' (expected 'memory' or 'file')",
					other
				)))
			}
		}
		if self.storage.cleanup_interval_seconds == 0 {
			return Err(ConfigError::Validation(
				"Storage cleanup_interval_seconds must be greater than 0".into(),
			));
		}
		if self.storage.cleanup_interval_seconds > 86400 {
			return Err(ConfigError::Validation(
				"Storage cleanup_interval_seconds cannot exceed 86400 (24 hours)".into(),
			));
		}

		Ok(())
	}
}

/// Implementation of FromStr for Config to enable parsing from a string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const BASE_CONFIG: &str = r#"
[service]
id = "stablepay"

[networks.84532]
name = "base-sepolia"
rpc_url = "https://sepolia.base.org"
payment_processor_address = "0x7c39408AC96a1b9a2722056eDE90b54D2B260380"
merchant_registry_address = "0x93e93Dfa36C87De32B9118CA5D9BAd1Db892002d"
explorer_url = "https://sepolia.basescan.org"

[networks.80002]
name = "polygon-amoy"
rpc_url = "https://rpc-amoy.polygon.technology"
payment_processor_address = "0x3B08Be115E1672cE8A6618D932a97B2Cc251d853"
merchant_registry_address = "0xE664919f8a195d44c8a137C71cBeb967A71eD3DF"
explorer_url = "https://amoy.polygonscan.com"

[chain]
active = 84532

[signer]
private_key = "${TEST_DEPLOYER_KEY:-0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80}"

[storage]
backend = "memory"
"#;

	#[test]
	fn test_parse_and_defaults() {
		let config: Config = BASE_CONFIG.parse().unwrap();
		assert_eq!(config.service.id, "stablepay");
		assert_eq!(config.chain.active, 84532);
		assert_eq!(config.chain.receipt_timeout_seconds, 120);
		assert_eq!(config.storage.cleanup_interval_seconds, 3600);
		assert_eq!(config.api.port, 8080);
		assert_eq!(config.active_network().name, "base-sepolia");
	}

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("TEST_STABLEPAY_HOST", "localhost");
		std::env::set_var("TEST_STABLEPAY_PORT", "5432");

		let input = "host = \"${TEST_STABLEPAY_HOST}:${TEST_STABLEPAY_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:5432\"");

		std::env::remove_var("TEST_STABLEPAY_HOST");
		std::env::remove_var("TEST_STABLEPAY_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${MISSING_STABLEPAY_VAR:-fallback}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"fallback\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${MISSING_STABLEPAY_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("MISSING_STABLEPAY_VAR"));
	}

	#[test]
	fn test_active_chain_must_exist() {
		let config_str = BASE_CONFIG.replace("active = 84532", "active = 1");
		let result: Result<Config, _> = config_str.parse();
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("Active chain 1"));
	}

	#[test]
	fn test_unknown_storage_backend_rejected() {
		let config_str = BASE_CONFIG.replace("backend = \"memory\"", "backend = \"postgres\"");
		let result: Result<Config, _> = config_str.parse();
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Unknown storage backend"));
	}

	#[test]
	fn test_empty_service_id_rejected() {
		let config_str = BASE_CONFIG.replace("id = \"stablepay\"", "id = \"\"");
		let result: Result<Config, _> = config_str.parse();
		assert!(result.is_err());
	}

	#[tokio::test]
	async fn test_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(&path, BASE_CONFIG).unwrap();

		let config = Config::from_file(path.to_str().unwrap()).await.unwrap();
		assert_eq!(config.networks.len(), 2);
	}
}
