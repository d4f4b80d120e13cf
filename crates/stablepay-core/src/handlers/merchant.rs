//! Merchant operation handlers.
//!
//! Merchant registration is platform-signed: the backend submits the
//! registration call itself, waits for the receipt, and derives the
//! merchant id from the emitted event. Field updates use the same
//! prepare/confirm staging as order operations, without a status guard
//! beyond existence.

use crate::abi::IMerchantRegistry;
use crate::descriptor::{parse_field_address, parse_field_hash, parse_field_id, require_non_empty};
use crate::engine::{OrderTransition, TransitionEngine};
use crate::verifier::ReceiptVerifier;
use crate::{StagingError, StagingService};
use alloy_primitives::U256;
use alloy_sol_types::SolCall;
use stablepay_storage::StorageError;
use stablepay_types::{
	current_timestamp, format_address, truncate_id, Bytes32Id, ChainTransaction,
	ConfirmTransactionRequest, ConfirmUpdateMerchantRequest, MerchantBalanceResponse,
	MerchantRecord, MerchantResponse, MerchantVerifiedResponse, OrderTransitionConfirmation,
	PrepareOrderResponse, PrepareUpdateMerchantResponse, RegisterMerchantRequest, StorageKey,
	TokenBalanceRecord, TokenBalanceRequest, UpdateMerchantRequest, VerificationStatus,
};

impl StagingService {
	/// Registers a merchant on chain and persists the resulting record.
	///
	/// The registration call is signed and submitted by the platform
	/// account; the merchant id is extracted from the MerchantRegistered
	/// log of the mined transaction.
	pub async fn register_merchant(
		&self,
		request: &RegisterMerchantRequest,
	) -> Result<MerchantResponse, StagingError> {
		require_non_empty("merchantName", &request.merchant_name)?;
		let payout = parse_field_address("payoutWalletAddress", &request.payout_wallet_address)?;
		require_non_empty("metadataURI", &request.metadata_uri)?;

		let data = IMerchantRegistry::registerMerchantCall {
			_payoutWalletAddress: payout,
			_metadataUri: request.metadata_uri.clone(),
		}
		.abi_encode();

		let tx_hash = self
			.chain
			.submit(ChainTransaction {
				to: self.network.merchant_registry_address,
				data,
				value: U256::ZERO,
			})
			.await?;
		let receipt = self.chain.wait_for_receipt(&tx_hash).await?;
		if !receipt.success {
			return Err(StagingError::ExecutionReverted);
		}

		let merchant_id = ReceiptVerifier::merchant_id_from_receipt(&receipt)?;

		let now = current_timestamp();
		let merchant = MerchantRecord {
			merchant_id: merchant_id.to_hex(),
			merchant_name: request.merchant_name.clone(),
			payout_wallet_address: format_address(&payout),
			metadata_uri: request.metadata_uri.clone(),
			verification_status: VerificationStatus::Pending,
			transaction_hash: format!("0x{}", hex::encode(receipt.hash)),
			created_at: now,
			updated_at: now,
		};

		self.storage
			.store(
				StorageKey::Merchants.as_str(),
				&merchant.merchant_id,
				&merchant,
			)
			.await
			.map_err(|e| StagingError::Persistence(e.to_string()))?;

		tracing::info!(
			merchant_id = %truncate_id(&merchant.merchant_id),
			"Merchant registered"
		);

		Ok(MerchantResponse {
			explorer_url: self.explorer_url(&merchant.transaction_hash),
			message: "Merchant registered successfully".to_string(),
			merchant,
		})
	}

	/// Fetches a stored merchant by id.
	pub async fn get_merchant(&self, merchant_id: &str) -> Result<MerchantResponse, StagingError> {
		let merchant_id = parse_field_id("merchantId", merchant_id)?;
		let merchant = self.load_merchant(&merchant_id).await?;

		Ok(MerchantResponse {
			explorer_url: self.explorer_url(&merchant.transaction_hash),
			message: "Success".to_string(),
			merchant,
		})
	}

	/// Removes a stored merchant record.
	pub async fn delete_merchant(&self, merchant_id: &str) -> Result<(), StagingError> {
		let merchant_id = parse_field_id("merchantId", merchant_id)?;
		// Confirm existence first so an unknown id is reported rather than
		// silently accepted.
		self.load_merchant(&merchant_id).await?;

		self.storage
			.remove(StorageKey::Merchants.as_str(), &merchant_id.to_hex())
			.await
			.map_err(|e| StagingError::Persistence(e.to_string()))
	}

	/// Queries a merchant wallet's token balance and persists the snapshot.
	pub async fn get_merchant_balance(
		&self,
		merchant_id: &str,
		request: &TokenBalanceRequest,
	) -> Result<MerchantBalanceResponse, StagingError> {
		let merchant_id = parse_field_id("merchantId", merchant_id)?;
		let wallet = parse_field_address("walletAddress", &request.wallet_address)?;
		let token = parse_field_address("tokenAddress", &request.token_address)?;

		let balance = self.chain.get_balance(wallet, Some(token)).await?;

		let snapshot = TokenBalanceRecord {
			merchant_id: merchant_id.to_hex(),
			wallet_address: format_address(&wallet),
			token_address: format_address(&token),
			token_balance: balance,
		};

		let key = format!("{}:{}", snapshot.merchant_id, snapshot.token_address);
		self.storage
			.store(StorageKey::TokenBalances.as_str(), &key, &snapshot)
			.await
			.map_err(|e| StagingError::Persistence(e.to_string()))?;

		Ok(MerchantBalanceResponse { snapshot })
	}

	/// Queries the registry contract for a merchant's verification flag.
	pub async fn is_merchant_verified(
		&self,
		merchant_id: &str,
	) -> Result<MerchantVerifiedResponse, StagingError> {
		let merchant_id = parse_field_id("merchantId", merchant_id)?;

		let data = IMerchantRegistry::isMerchantVerifiedCall {
			_merchantId: merchant_id.0,
		}
		.abi_encode();

		let raw = self
			.chain
			.call(self.network.merchant_registry_address, data)
			.await?;
		let decoded = IMerchantRegistry::isMerchantVerifiedCall::abi_decode_returns(&raw, true)
			.map_err(|e| StagingError::Chain(format!("Invalid isMerchantVerified response: {}", e)))?;

		Ok(MerchantVerifiedResponse {
			is_verified: decoded._0,
		})
	}

	/// Prepares a merchant field update.
	///
	/// Omitted fields fall back to the currently persisted values, so a
	/// client can change the payout wallet without resending the metadata
	/// reference and vice versa.
	pub async fn prepare_update_merchant(
		&self,
		merchant_id: &str,
		request: &UpdateMerchantRequest,
	) -> Result<PrepareUpdateMerchantResponse, StagingError> {
		if request.payout_wallet_address.is_none() && request.metadata_uri.is_none() {
			return Err(StagingError::validation(
				"payoutWalletAddress",
				"payoutWalletAddress or metadataURI is required",
			));
		}

		let merchant_id = parse_field_id("merchantId", merchant_id)?;
		let current = self.load_merchant(&merchant_id).await?;

		let payout_wallet_address = request
			.payout_wallet_address
			.clone()
			.filter(|v| !v.is_empty())
			.unwrap_or(current.payout_wallet_address);
		let metadata_uri = request
			.metadata_uri
			.clone()
			.filter(|v| !v.is_empty())
			.unwrap_or(current.metadata_uri);

		let descriptor = self.builder.update_merchant(
			&merchant_id.to_hex(),
			&payout_wallet_address,
			&metadata_uri,
		)?;

		Ok(PrepareUpdateMerchantResponse {
			transaction_data: descriptor,
			merchant_id: merchant_id.to_hex(),
			payout_wallet_address,
			metadata_uri,
			message: "Sign this transaction with your wallet to update the merchant".to_string(),
		})
	}

	/// Confirms a merchant field update.
	pub async fn confirm_update_merchant(
		&self,
		merchant_id: &str,
		request: &ConfirmUpdateMerchantRequest,
	) -> Result<MerchantResponse, StagingError> {
		let merchant_id = parse_field_id("merchantId", merchant_id)?;
		let tx_hash = parse_field_hash("transactionHash", &request.transaction_hash)?;

		let id = merchant_id.to_hex();
		let _guard = self.storage.lock(StorageKey::Merchants.as_str(), &id).await;

		let mut merchant = self.load_merchant(&merchant_id).await?;
		self.verifier.verify_success(&tx_hash).await?;

		if let Some(name) = request.merchant_name.clone().filter(|v| !v.is_empty()) {
			merchant.merchant_name = name;
		}
		if let Some(payout) = &request.payout_wallet_address {
			let payout = parse_field_address("payoutWalletAddress", payout)?;
			merchant.payout_wallet_address = format_address(&payout);
		}
		if let Some(uri) = request.metadata_uri.clone().filter(|v| !v.is_empty()) {
			merchant.metadata_uri = uri;
		}
		merchant.transaction_hash = tx_hash.to_hex();
		merchant.updated_at = current_timestamp();

		self.storage
			.update(StorageKey::Merchants.as_str(), &id, &merchant)
			.await
			.map_err(|e| StagingError::Persistence(e.to_string()))?;

		Ok(MerchantResponse {
			explorer_url: self.explorer_url(&merchant.transaction_hash),
			message: "Merchant updated successfully".to_string(),
			merchant,
		})
	}

	/// Prepares a merchant-initiated refund of an order.
	pub async fn prepare_merchant_refund(
		&self,
		order_id: &str,
	) -> Result<PrepareOrderResponse, StagingError> {
		let order_id = parse_field_id("orderId", order_id)?;
		let order = self.engine.load_order(&order_id).await?;
		TransitionEngine::check_guard(&order, OrderTransition::Refund)?;

		let descriptor = self.builder.merchant_refund_order(&order_id.to_hex())?;

		Ok(PrepareOrderResponse {
			transaction_data: descriptor,
			order_id: order_id.to_hex(),
			message: "Sign this transaction with your wallet to refund the order".to_string(),
		})
	}

	/// Confirms a merchant-initiated refund.
	pub async fn confirm_merchant_refund(
		&self,
		order_id: &str,
		request: &ConfirmTransactionRequest,
	) -> Result<OrderTransitionConfirmation, StagingError> {
		self.confirm_order_transition(
			order_id,
			&request.transaction_hash,
			OrderTransition::Refund,
			"Order refunded successfully",
		)
		.await
	}

	/// Fetches a merchant record, mapping a missing key to MerchantNotFound.
	pub(crate) async fn load_merchant(
		&self,
		merchant_id: &Bytes32Id,
	) -> Result<MerchantRecord, StagingError> {
		self.storage
			.retrieve(StorageKey::Merchants.as_str(), &merchant_id.to_hex())
			.await
			.map_err(|e| match e {
				StorageError::NotFound => StagingError::MerchantNotFound(merchant_id.to_hex()),
				other => StagingError::Persistence(other.to_string()),
			})
	}
}
