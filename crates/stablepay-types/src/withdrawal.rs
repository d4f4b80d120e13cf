//! Emergency withdrawal audit records.

use serde::{Deserialize, Serialize};

/// Audit record written after a platform-signed emergency withdrawal
/// has been confirmed on chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRecord {
	/// Token contract the funds were withdrawn from.
	pub token_address: String,
	/// Address that received the funds.
	pub receiver_address: String,
	/// Withdrawn amount in token base units.
	pub amount: String,
	/// Contract the withdrawal was executed against.
	pub sender_address: String,
	/// Hash of the withdrawal transaction.
	pub transaction_hash: String,
}
