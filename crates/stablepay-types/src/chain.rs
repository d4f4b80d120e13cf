//! Chain interaction types.
//!
//! This module defines the transaction and receipt structures exchanged
//! with the chain client, independent of any particular RPC library.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// A contract call ready for platform-signed submission.
///
/// Gas limit and fees are left to the submitting provider; only
/// client-signed descriptors carry static gas ceilings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTransaction {
	/// Destination contract address.
	pub to: Address,
	/// ABI-encoded call payload.
	pub data: Vec<u8>,
	/// Native value to transfer with the call.
	pub value: U256,
}

/// A single log entry emitted by a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
	/// Address of the contract that emitted the log.
	pub address: Address,
	/// Indexed topics, with the event signature hash first.
	pub topics: Vec<B256>,
	/// Non-indexed event data.
	pub data: Vec<u8>,
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReceipt {
	/// The hash of the transaction.
	pub hash: B256,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
	/// Ordered log entries emitted during execution.
	pub logs: Vec<LogEntry>,
}
