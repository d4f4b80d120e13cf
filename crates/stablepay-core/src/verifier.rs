//! Transaction receipt verification and event extraction.
//!
//! Given a client-supplied transaction hash, the verifier performs a
//! single-shot receipt lookup and classifies the outcome: still pending,
//! reverted, or successful. For operations that mint an identifier on
//! chain, the emitted event is decoded from the receipt's logs.

use crate::abi::{IMerchantRegistry, IPaymentProcessor};
use crate::StagingError;
use alloy_primitives::{Log, LogData};
use alloy_sol_types::SolEvent;
use stablepay_chain::ChainInterface;
use stablepay_types::{Bytes32Id, ChainReceipt, TransactionHash};
use std::sync::Arc;

/// Verifies mined transactions against the chain client.
#[derive(Clone)]
pub struct ReceiptVerifier {
	chain: Arc<dyn ChainInterface>,
}

impl ReceiptVerifier {
	/// Creates a verifier over the injected chain client.
	pub fn new(chain: Arc<dyn ChainInterface>) -> Self {
		Self { chain }
	}

	/// Looks up a receipt and requires a successful execution.
	///
	/// A missing receipt maps to [`StagingError::ReceiptPending`]; callers
	/// re-invoke the confirm step once the transaction is mined. A mined
	/// receipt with failure status is terminal.
	pub async fn verify_success(
		&self,
		tx_hash: &TransactionHash,
	) -> Result<ChainReceipt, StagingError> {
		let receipt = self.chain.get_receipt(&tx_hash.0).await?;

		if !receipt.success {
			tracing::warn!(tx_hash = %tx_hash, "Transaction reverted on chain");
			return Err(StagingError::ExecutionReverted);
		}

		Ok(receipt)
	}

	/// Decodes the first log that matches the expected event.
	///
	/// Every log entry is tried in order against the event descriptor;
	/// the first successful decode wins. A single user-initiated call
	/// emits the event at most once, so later matches are not consulted.
	pub fn decode_event<E: SolEvent>(receipt: &ChainReceipt) -> Result<E, StagingError> {
		for entry in &receipt.logs {
			let log = Log {
				address: entry.address,
				data: LogData::new_unchecked(entry.topics.clone(), entry.data.clone().into()),
			};
			if let Ok(decoded) = E::decode_log(&log, true) {
				return Ok(decoded.data);
			}
		}

		Err(StagingError::EventNotFound(E::SIGNATURE))
	}

	/// Extracts the order id minted by a createOrder transaction.
	pub fn order_id_from_receipt(receipt: &ChainReceipt) -> Result<Bytes32Id, StagingError> {
		let event = Self::decode_event::<IPaymentProcessor::OrderCreated>(receipt)?;
		Ok(Bytes32Id::from(event.orderId))
	}

	/// Extracts the merchant id minted by a registerMerchant transaction.
	pub fn merchant_id_from_receipt(receipt: &ChainReceipt) -> Result<Bytes32Id, StagingError> {
		let event = Self::decode_event::<IMerchantRegistry::MerchantRegistered>(receipt)?;
		Ok(Bytes32Id::from(event.merchantId))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, b256, B256, U256};
	use alloy_sol_types::SolEvent;
	use stablepay_types::LogEntry;

	fn order_created_log() -> LogEntry {
		let event = IPaymentProcessor::OrderCreated {
			orderId: b256!("cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc"),
			payer: address!("2222222222222222222222222222222222222222"),
			merchantId: b256!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
			merchantPayout: address!("3333333333333333333333333333333333333333"),
			token: address!("1111111111111111111111111111111111111111"),
			amount: U256::from(1_000_000u64),
			status: 0,
			metadataUri: "ipfs://x".to_string(),
		};
		let data = event.encode_log_data();
		LogEntry {
			address: address!("7c39408AC96a1b9a2722056eDE90b54D2B260380"),
			topics: data.topics().to_vec(),
			data: data.data.to_vec(),
		}
	}

	fn unrelated_log() -> LogEntry {
		LogEntry {
			address: address!("4444444444444444444444444444444444444444"),
			topics: vec![B256::ZERO],
			data: vec![0u8; 8],
		}
	}

	fn receipt_with_logs(logs: Vec<LogEntry>) -> ChainReceipt {
		ChainReceipt {
			hash: B256::repeat_byte(0x11),
			block_number: 7,
			success: true,
			logs,
		}
	}

	#[test]
	fn test_order_id_extracted_from_logs() {
		let receipt = receipt_with_logs(vec![unrelated_log(), order_created_log()]);
		let order_id = ReceiptVerifier::order_id_from_receipt(&receipt).unwrap();
		assert_eq!(
			order_id.to_hex(),
			"0xcccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc"
		);
	}

	#[test]
	fn test_missing_event_is_reported() {
		let receipt = receipt_with_logs(vec![unrelated_log()]);
		let err = ReceiptVerifier::order_id_from_receipt(&receipt).unwrap_err();
		assert!(matches!(err, StagingError::EventNotFound(_)));
	}

	#[test]
	fn test_first_matching_log_wins() {
		// Two decodable logs should not happen for a single call; the
		// policy is first-match.
		let receipt = receipt_with_logs(vec![order_created_log(), order_created_log()]);
		assert!(ReceiptVerifier::order_id_from_receipt(&receipt).is_ok());
	}
}
