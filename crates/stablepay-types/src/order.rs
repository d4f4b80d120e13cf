//! Order records and lifecycle status.
//!
//! Orders mirror on-chain sales: a record is created only after the
//! creating transaction has been verified on chain, and its status advances
//! through the transition table enforced by the core engine. Records are
//! never hard-deleted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an order.
///
/// Stored as the lowercase strings below. Parsing is strict: an unknown
/// status string cannot enter the transition engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
	/// Order has been created on chain but not yet paid.
	Created,
	/// Payment has been confirmed on chain.
	Paid,
	/// Funds have been released to the merchant.
	Settled,
	/// Funds have been returned to the payer.
	Refunded,
	/// Order was cancelled before settlement.
	Cancelled,
}

impl OrderStatus {
	/// Returns the storage string representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Created => "created",
			OrderStatus::Paid => "paid",
			OrderStatus::Settled => "settled",
			OrderStatus::Refunded => "refunded",
			OrderStatus::Cancelled => "cancelled",
		}
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"created" => Ok(OrderStatus::Created),
			"paid" => Ok(OrderStatus::Paid),
			"settled" => Ok(OrderStatus::Settled),
			"refunded" => Ok(OrderStatus::Refunded),
			"cancelled" => Ok(OrderStatus::Cancelled),
			other => Err(format!("unknown order status '{}'", other)),
		}
	}
}

/// Persisted order record mirroring on-chain state.
///
/// Identifier and address fields hold canonical `0x`-prefixed lowercase hex
/// strings; `amount` is a decimal string in token base units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
	/// 32-byte order id, derived from the on-chain OrderCreated event.
	pub order_id: String,
	/// 32-byte id of the merchant the order belongs to.
	pub merchant_id: String,
	/// Address of the paying wallet.
	pub payer_address: String,
	/// Address of the payment token contract.
	pub token_address: String,
	/// Order amount in token base units.
	pub amount: String,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Opaque metadata reference supplied at creation.
	pub metadata_uri: String,
	/// Hash of the last chain transaction associated with this order.
	pub transaction_hash: String,
	/// Timestamp when this record was created.
	pub created_at: u64,
	/// Timestamp when this record was last updated.
	pub updated_at: u64,
}
