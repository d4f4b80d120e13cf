//! Unsigned transaction descriptor returned to clients for signing.

use serde::{Deserialize, Serialize};

/// An unsigned contract-call payload.
///
/// Descriptors are transient response artifacts: they are produced by the
/// descriptor builder, handed to the client wallet for signing, and never
/// persisted. The gas limit is a fixed per-operation ceiling, not a
/// simulation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDescriptor {
	/// Destination contract address, canonical lowercase hex.
	pub to: String,
	/// Hex-encoded call payload with `0x` prefix.
	pub data: String,
	/// Chain the transaction must be submitted to.
	pub chain_id: u64,
	/// Native-value amount as a decimal string.
	pub value: String,
	/// Static gas-limit ceiling for this operation type.
	pub gas_limit: u64,
}
