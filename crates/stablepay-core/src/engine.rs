//! Order status transition engine.
//!
//! The authoritative state machine governing `OrderRecord.status`. Every
//! confirm step runs the same sequence: record lookup, guard check against
//! the current persisted status, receipt verification, then a single write
//! of the new status and transaction hash. The per-record lock is held
//! across the whole sequence, so concurrent confirms for the same id
//! serialize and the loser fails its guard check instead of overwriting.

use crate::verifier::ReceiptVerifier;
use crate::StagingError;
use stablepay_storage::{StorageError, StorageService};
use stablepay_types::{
	current_timestamp, truncate_id, Bytes32Id, OrderRecord, OrderStatus, StorageKey,
	TransactionHash,
};
use std::sync::Arc;

/// A confirmed order transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTransition {
	/// created -> paid
	Pay,
	/// paid -> settled
	Settle,
	/// paid | settled -> refunded
	Refund,
	/// created | paid | settled -> cancelled
	Cancel,
}

impl OrderTransition {
	/// Statuses this transition may start from.
	pub fn allowed_from(&self) -> &'static [OrderStatus] {
		match self {
			OrderTransition::Pay => &[OrderStatus::Created],
			OrderTransition::Settle => &[OrderStatus::Paid],
			OrderTransition::Refund => &[OrderStatus::Paid, OrderStatus::Settled],
			OrderTransition::Cancel => &[
				OrderStatus::Created,
				OrderStatus::Paid,
				OrderStatus::Settled,
			],
		}
	}

	/// Status this transition lands in.
	pub fn target(&self) -> OrderStatus {
		match self {
			OrderTransition::Pay => OrderStatus::Paid,
			OrderTransition::Settle => OrderStatus::Settled,
			OrderTransition::Refund => OrderStatus::Refunded,
			OrderTransition::Cancel => OrderStatus::Cancelled,
		}
	}

	/// Operation name used in guard-violation errors.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderTransition::Pay => "pay",
			OrderTransition::Settle => "settle",
			OrderTransition::Refund => "refund",
			OrderTransition::Cancel => "cancel",
		}
	}
}

/// Drives guarded order status transitions.
pub struct TransitionEngine {
	storage: Arc<StorageService>,
	verifier: ReceiptVerifier,
}

impl TransitionEngine {
	pub fn new(storage: Arc<StorageService>, verifier: ReceiptVerifier) -> Self {
		Self { storage, verifier }
	}

	/// Fetches an order record by id.
	pub async fn load_order(&self, order_id: &Bytes32Id) -> Result<OrderRecord, StagingError> {
		self.storage
			.retrieve(StorageKey::Orders.as_str(), &order_id.to_hex())
			.await
			.map_err(|e| match e {
				StorageError::NotFound => StagingError::OrderNotFound(order_id.to_hex()),
				other => StagingError::Persistence(other.to_string()),
			})
	}

	/// Checks that a transition is permitted from the order's current status.
	pub fn check_guard(
		order: &OrderRecord,
		transition: OrderTransition,
	) -> Result<(), StagingError> {
		if transition.allowed_from().contains(&order.status) {
			Ok(())
		} else {
			Err(StagingError::InvalidState {
				current: order.status,
				requested: transition.as_str(),
			})
		}
	}

	/// Confirms a transition for an order.
	///
	/// On any failure before the final write the persisted record is left
	/// unchanged; the caller may retry the whole confirm step, which is
	/// safe because verification against an already-mined transaction is
	/// idempotent.
	pub async fn confirm(
		&self,
		order_id: &Bytes32Id,
		transition: OrderTransition,
		tx_hash: &TransactionHash,
	) -> Result<OrderRecord, StagingError> {
		let id = order_id.to_hex();
		let _guard = self.storage.lock(StorageKey::Orders.as_str(), &id).await;

		let mut order = self.load_order(order_id).await?;
		Self::check_guard(&order, transition)?;

		self.verifier.verify_success(tx_hash).await?;

		order.status = transition.target();
		order.transaction_hash = tx_hash.to_hex();
		order.updated_at = current_timestamp();

		self.storage
			.update(StorageKey::Orders.as_str(), &id, &order)
			.await
			.map_err(|e| StagingError::Persistence(e.to_string()))?;

		tracing::info!(
			order_id = %truncate_id(&id),
			status = %order.status,
			"Order status transitioned"
		);

		Ok(order)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn order_with_status(status: OrderStatus) -> OrderRecord {
		OrderRecord {
			order_id: "0x".to_string() + &"cc".repeat(32),
			merchant_id: "0x".to_string() + &"aa".repeat(32),
			payer_address: "0x".to_string() + &"22".repeat(20),
			token_address: "0x".to_string() + &"11".repeat(20),
			amount: "1000000".to_string(),
			status,
			metadata_uri: "ipfs://x".to_string(),
			transaction_hash: "0x".to_string() + &"33".repeat(32),
			created_at: 0,
			updated_at: 0,
		}
	}

	#[test]
	fn test_settle_only_from_paid() {
		for status in [
			OrderStatus::Created,
			OrderStatus::Settled,
			OrderStatus::Refunded,
			OrderStatus::Cancelled,
		] {
			let order = order_with_status(status);
			let err =
				TransitionEngine::check_guard(&order, OrderTransition::Settle).unwrap_err();
			match err {
				StagingError::InvalidState { current, requested } => {
					assert_eq!(current, status);
					assert_eq!(requested, "settle");
				}
				other => panic!("expected InvalidState, got {:?}", other),
			}
		}

		let paid = order_with_status(OrderStatus::Paid);
		assert!(TransitionEngine::check_guard(&paid, OrderTransition::Settle).is_ok());
	}

	#[test]
	fn test_refund_from_paid_and_settled_only() {
		for status in [OrderStatus::Paid, OrderStatus::Settled] {
			let order = order_with_status(status);
			assert!(TransitionEngine::check_guard(&order, OrderTransition::Refund).is_ok());
		}
		for status in [
			OrderStatus::Created,
			OrderStatus::Refunded,
			OrderStatus::Cancelled,
		] {
			let order = order_with_status(status);
			assert!(TransitionEngine::check_guard(&order, OrderTransition::Refund).is_err());
		}
	}

	#[test]
	fn test_pay_only_from_created() {
		assert!(TransitionEngine::check_guard(
			&order_with_status(OrderStatus::Created),
			OrderTransition::Pay
		)
		.is_ok());
		for status in [
			OrderStatus::Paid,
			OrderStatus::Settled,
			OrderStatus::Refunded,
			OrderStatus::Cancelled,
		] {
			assert!(TransitionEngine::check_guard(
				&order_with_status(status),
				OrderTransition::Pay
			)
			.is_err());
		}
	}

	#[test]
	fn test_terminal_statuses_have_no_outbound_transitions() {
		for status in [OrderStatus::Refunded, OrderStatus::Cancelled] {
			for transition in [
				OrderTransition::Pay,
				OrderTransition::Settle,
				OrderTransition::Refund,
				OrderTransition::Cancel,
			] {
				assert!(TransitionEngine::check_guard(
					&order_with_status(status),
					transition
				)
				.is_err());
			}
		}
	}

	#[test]
	fn test_transition_targets() {
		assert_eq!(OrderTransition::Pay.target(), OrderStatus::Paid);
		assert_eq!(OrderTransition::Settle.target(), OrderStatus::Settled);
		assert_eq!(OrderTransition::Refund.target(), OrderStatus::Refunded);
		assert_eq!(OrderTransition::Cancel.target(), OrderStatus::Cancelled);
	}
}
