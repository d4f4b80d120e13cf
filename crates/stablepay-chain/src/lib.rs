//! Chain client module for the stablepay system.
//!
//! This module abstracts the blockchain collaborator consumed by the
//! staging protocol: receipt lookups for confirm steps, read-only contract
//! calls, and platform-signed submission for privileged operations. The
//! client is an explicitly constructed, dependency-injected object; there
//! is no process-global instance.

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use stablepay_types::{ChainReceipt, ChainTransaction};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur during chain client operations.
#[derive(Debug, Error)]
pub enum ChainError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// The transaction is unknown to the node or not yet mined.
	#[error("Transaction not found or not yet mined")]
	TransactionNotFound,
	/// A platform-signed submission was mined but did not succeed.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
	/// The receipt did not arrive within the configured wait window.
	#[error("Timed out waiting for transaction receipt after {0} seconds")]
	ReceiptTimeout(u64),
	/// The configured signer key could not be parsed.
	#[error("Invalid signer key")]
	InvalidSigner,
}

/// Trait defining the interface to the blockchain collaborator.
///
/// `get_receipt` is the single-shot lookup used by the confirm path of the
/// staging protocol; callers re-invoke it while a transaction is pending.
/// `submit` and `wait_for_receipt` exist only for platform-signed
/// operations where this backend is itself the transaction sender.
#[async_trait]
pub trait ChainInterface: Send + Sync {
	/// Returns the chain id this client is connected to.
	fn chain_id(&self) -> u64;

	/// Retrieves the receipt for a transaction if available.
	///
	/// Returns immediately with the current receipt, or
	/// [`ChainError::TransactionNotFound`] if the transaction is not mined.
	async fn get_receipt(&self, hash: &B256) -> Result<ChainReceipt, ChainError>;

	/// Signs and submits a transaction with the platform account.
	///
	/// Gas parameters are filled by the provider; returns the transaction
	/// hash once accepted by the node.
	async fn submit(&self, tx: ChainTransaction) -> Result<B256, ChainError>;

	/// Polls for a transaction receipt until it is mined or the configured
	/// wait window elapses.
	async fn wait_for_receipt(&self, hash: &B256) -> Result<ChainReceipt, ChainError>;

	/// Executes a read-only contract call and returns the raw return data.
	async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError>;

	/// Gets the balance for an address.
	///
	/// For native tokens, pass None for the token parameter.
	/// For ERC-20 tokens, pass the contract address as Some(address).
	/// Returns the balance as a decimal string.
	async fn get_balance(
		&self,
		address: Address,
		token: Option<Address>,
	) -> Result<String, ChainError>;
}
