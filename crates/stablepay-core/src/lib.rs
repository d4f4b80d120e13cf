//! Core staging protocol for the stablepay system.
//!
//! This crate implements the prepare/confirm transaction-staging protocol:
//! validating a requested operation, encoding it into an unsigned call
//! descriptor for a client wallet to sign, and later reconciling a
//! submitted transaction hash against on-chain receipt status before
//! committing a state transition in storage.

use stablepay_chain::{ChainError, ChainInterface};
use stablepay_storage::StorageService;
use stablepay_types::{NetworkConfig, OrderStatus};
use std::sync::Arc;
use thiserror::Error;

/// Contract ABI definitions.
pub mod abi;
/// Unsigned call descriptor construction and input validation.
pub mod descriptor;
/// Order status transition engine.
pub mod engine;
/// Prepare/confirm operation handlers.
pub mod handlers {
	pub mod merchant;
	pub mod order;
	pub mod platform;
}
/// Transaction receipt verification and event extraction.
pub mod verifier;

pub use descriptor::DescriptorBuilder;
pub use engine::{OrderTransition, TransitionEngine};
pub use verifier::ReceiptVerifier;

/// Errors produced by the staging protocol.
///
/// Callers distinguish retryable conditions (receipt still pending, a
/// failed storage write, a transport fault) from terminal ones (bad input,
/// a guard violation, a reverted transaction) via [`StagingError::is_retryable`].
/// No retries happen inside the core; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum StagingError {
	/// Malformed input; the named field must be corrected before retrying.
	#[error("{field}: {message}")]
	Validation {
		field: &'static str,
		message: String,
	},
	/// No order is stored under the given id.
	#[error("Order not found: {0}")]
	OrderNotFound(String),
	/// No merchant is stored under the given id.
	#[error("Merchant not found: {0}")]
	MerchantNotFound(String),
	/// The requested transition is not permitted from the current status.
	#[error("Operation '{requested}' not permitted: order status is '{current}'")]
	InvalidState {
		current: OrderStatus,
		requested: &'static str,
	},
	/// The transaction is not yet mined; retry the confirm step later.
	#[error("Transaction not found or not yet mined")]
	ReceiptPending,
	/// The transaction was mined but the contract call failed.
	#[error("Transaction failed on blockchain")]
	ExecutionReverted,
	/// A success receipt was returned without the expected log entry.
	#[error("Expected event not found in transaction logs: {0}")]
	EventNotFound(&'static str),
	/// A storage write failed; the record was not transitioned.
	#[error("Storage error: {0}")]
	Persistence(String),
	/// The chain client reported a transport-level fault.
	#[error("Chain client error: {0}")]
	Chain(String),
}

impl StagingError {
	/// Convenience constructor for field-specific validation failures.
	pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
		Self::Validation {
			field,
			message: message.into(),
		}
	}

	/// Whether the caller may retry the same request unchanged.
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			StagingError::ReceiptPending | StagingError::Persistence(_) | StagingError::Chain(_)
		)
	}
}

impl From<ChainError> for StagingError {
	fn from(err: ChainError) -> Self {
		match err {
			ChainError::TransactionNotFound => StagingError::ReceiptPending,
			ChainError::TransactionFailed(_) => StagingError::ExecutionReverted,
			other => StagingError::Chain(other.to_string()),
		}
	}
}

/// The staging protocol service.
///
/// Holds the injected collaborators (chain client, record store) and the
/// static chain configuration. All prepare/confirm operations are methods
/// on this type, grouped by module under [`handlers`].
pub struct StagingService {
	pub(crate) chain: Arc<dyn ChainInterface>,
	pub(crate) storage: Arc<StorageService>,
	pub(crate) network: NetworkConfig,
	pub(crate) builder: DescriptorBuilder,
	pub(crate) verifier: ReceiptVerifier,
	pub(crate) engine: TransitionEngine,
}

impl StagingService {
	/// Creates a new staging service for one network.
	///
	/// The chain client and storage service are constructed by the caller
	/// and shared by reference; the service itself holds no global state.
	pub fn new(
		chain: Arc<dyn ChainInterface>,
		storage: Arc<StorageService>,
		network: NetworkConfig,
	) -> Self {
		let builder = DescriptorBuilder::new(
			chain.chain_id(),
			network.payment_processor_address,
			network.merchant_registry_address,
		);
		let verifier = ReceiptVerifier::new(Arc::clone(&chain));
		let engine = TransitionEngine::new(Arc::clone(&storage), verifier.clone());

		Self {
			chain,
			storage,
			network,
			builder,
			verifier,
			engine,
		}
	}

	/// Builds a block-explorer link for a transaction hash.
	pub(crate) fn explorer_url(&self, tx_hash: &str) -> String {
		self.network.explorer_tx_url(tx_hash)
	}
}
