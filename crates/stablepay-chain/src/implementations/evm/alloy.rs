//! Alloy-based EVM chain client implementation.
//!
//! This module provides the concrete implementation of the ChainInterface
//! trait for EVM-compatible networks using the Alloy library. The provider
//! carries the platform wallet so privileged operations can be signed and
//! submitted directly.

use crate::{ChainError, ChainInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, B256, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;
use async_trait::async_trait;
use stablepay_types::{ChainReceipt, ChainTransaction, LogEntry, SecretString};
use std::sync::Arc;
use std::time::Duration;

/// Poll interval while waiting for a platform-signed transaction to mine.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Alloy-based EVM chain client.
///
/// Wraps a single network's provider. The active network is chosen at
/// startup from configuration; the instance is handed to the staging
/// protocol by reference, never through global state.
pub struct AlloyChain {
	/// Alloy provider with the platform wallet attached.
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
	/// Chain id of the connected network.
	chain_id: u64,
	/// Maximum time to wait in `wait_for_receipt`.
	receipt_timeout: Duration,
}

impl AlloyChain {
	/// Creates a new AlloyChain instance connected to one network.
	///
	/// The private key signs platform-initiated transactions (merchant
	/// registration, emergency withdrawal, verification updates). Client
	/// transactions are never signed here; they are staged as descriptors.
	pub fn connect(
		chain_id: u64,
		rpc_url: &str,
		platform_key: &SecretString,
		receipt_timeout: Duration,
	) -> Result<Self, ChainError> {
		let url = rpc_url
			.parse()
			.map_err(|e| ChainError::Network(format!("Invalid RPC URL: {}", e)))?;

		let signer: PrivateKeySigner = platform_key
			.with_exposed(|key| key.parse().map_err(|_| ChainError::InvalidSigner))?;
		let chain_signer = signer.with_chain_id(Some(chain_id));
		let wallet = EthereumWallet::from(chain_signer);

		let provider = ProviderBuilder::new()
			.with_recommended_fillers()
			.wallet(wallet)
			.on_http(url);

		provider
			.client()
			.set_poll_interval(std::time::Duration::from_secs(7));

		Ok(Self {
			provider: Arc::new(provider) as Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
			chain_id,
			receipt_timeout,
		})
	}

	/// Converts an RPC receipt into the internal receipt structure.
	fn convert_receipt(receipt: alloy_rpc_types::TransactionReceipt) -> ChainReceipt {
		let logs = receipt
			.inner
			.logs()
			.iter()
			.map(|log| LogEntry {
				address: log.address(),
				topics: log.topics().to_vec(),
				data: log.data().data.to_vec(),
			})
			.collect();

		ChainReceipt {
			hash: receipt.transaction_hash,
			block_number: receipt.block_number.unwrap_or(0),
			success: receipt.status(),
			logs,
		}
	}
}

#[async_trait]
impl ChainInterface for AlloyChain {
	fn chain_id(&self) -> u64 {
		self.chain_id
	}

	async fn get_receipt(&self, hash: &B256) -> Result<ChainReceipt, ChainError> {
		match self.provider.get_transaction_receipt(*hash).await {
			Ok(Some(receipt)) => Ok(Self::convert_receipt(receipt)),
			Ok(None) => Err(ChainError::TransactionNotFound),
			Err(e) => Err(ChainError::Network(format!("Failed to get receipt: {}", e))),
		}
	}

	async fn submit(&self, tx: ChainTransaction) -> Result<B256, ChainError> {
		let request = TransactionRequest::default()
			.to(tx.to)
			.input(tx.data.into())
			.value(tx.value);

		let pending_tx = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| ChainError::Network(format!("Failed to send transaction: {}", e)))?;

		let tx_hash = *pending_tx.tx_hash();
		tracing::info!(
			tx_hash = %format!("0x{}", hex::encode(tx_hash)),
			chain_id = self.chain_id,
			"Submitted platform transaction"
		);

		Ok(tx_hash)
	}

	async fn wait_for_receipt(&self, hash: &B256) -> Result<ChainReceipt, ChainError> {
		let start_time = tokio::time::Instant::now();

		loop {
			if start_time.elapsed() > self.receipt_timeout {
				return Err(ChainError::ReceiptTimeout(self.receipt_timeout.as_secs()));
			}

			match self.provider.get_transaction_receipt(*hash).await {
				Ok(Some(receipt)) => return Ok(Self::convert_receipt(receipt)),
				Ok(None) => {
					tracing::debug!(
						tx_hash = %format!("0x{}", hex::encode(hash)),
						"Transaction not yet mined, retrying"
					);
					tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
				}
				Err(e) => {
					return Err(ChainError::Network(format!("Failed to get receipt: {}", e)));
				}
			}
		}
	}

	async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
		let request = TransactionRequest::default().to(to).input(data.into());

		let result = self
			.provider
			.call(&request)
			.await
			.map_err(|e| ChainError::Network(format!("Contract call failed: {}", e)))?;

		Ok(result.to_vec())
	}

	async fn get_balance(
		&self,
		address: Address,
		token: Option<Address>,
	) -> Result<String, ChainError> {
		match token {
			None => {
				let balance = self
					.provider
					.get_balance(address)
					.await
					.map_err(|e| ChainError::Network(format!("Failed to get balance: {}", e)))?;

				Ok(balance.to_string())
			}
			Some(token_address) => {
				// balanceOf(address) selector is 0x70a08231
				let selector = [0x70, 0xa0, 0x82, 0x31];
				let mut call_data = Vec::new();
				call_data.extend_from_slice(&selector);
				call_data.extend_from_slice(&[0; 12]); // Pad to 32 bytes
				call_data.extend_from_slice(address.as_slice());

				let result = self.call(token_address, call_data).await?;

				if result.len() < 32 {
					return Err(ChainError::Network("Invalid balanceOf response".to_string()));
				}

				let balance = U256::from_be_slice(&result[..32]);
				Ok(balance.to_string())
			}
		}
	}
}
