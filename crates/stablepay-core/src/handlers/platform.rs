//! Platform operation handlers.
//!
//! Settlement and refund staging for the platform operator, plus the
//! privileged platform-signed operations: emergency withdrawal, token
//! support toggles, registry updates, and merchant verification changes.
//! Platform-signed calls are submitted directly with the configured
//! platform account and block until their receipt is available.

use crate::abi::IPaymentProcessor;
use crate::descriptor::{parse_amount, parse_field_address, parse_field_id};
use crate::engine::{OrderTransition, TransitionEngine};
use crate::{StagingError, StagingService};
use alloy_primitives::U256;
use alloy_sol_types::SolCall;
use stablepay_types::{
	current_timestamp, format_address, truncate_id, BalanceResponse, ChainReceipt,
	ChainTransaction, ConfirmOrderRequest, ContractBalanceRequest, EmergencyWithdrawRequest,
	MerchantVerificationRequest, OrderRequest, OrderTransitionConfirmation,
	PlatformBalanceRequest, PrepareOrderResponse, RegistryUpdateRequest, StorageKey,
	TokenSupportRequest, TransactionConfirmation, VerificationStatus,
	VerificationStatusResponse, WithdrawalRecord, WithdrawalResponse, WithdrawalToggleRequest,
};

impl StagingService {
	/// Prepares settlement of a paid order.
	pub async fn prepare_settle_order(
		&self,
		request: &OrderRequest,
	) -> Result<PrepareOrderResponse, StagingError> {
		let order_id = parse_field_id("orderId", &request.order_id)?;
		let order = self.engine.load_order(&order_id).await?;
		TransitionEngine::check_guard(&order, OrderTransition::Settle)?;

		let descriptor = self.builder.settle_order(&order_id.to_hex())?;

		Ok(PrepareOrderResponse {
			transaction_data: descriptor,
			order_id: order_id.to_hex(),
			message: "Please sign with your wallet to settle the order and transfer funds to the merchant.".to_string(),
		})
	}

	/// Confirms settlement of an order.
	pub async fn confirm_settle_order(
		&self,
		request: &ConfirmOrderRequest,
	) -> Result<OrderTransitionConfirmation, StagingError> {
		self.confirm_order_transition(
			&request.order_id,
			&request.transaction_hash,
			OrderTransition::Settle,
			"Order settled successfully. Funds transferred to merchant.",
		)
		.await
	}

	/// Prepares a refund of a paid or settled order.
	pub async fn prepare_refund_order(
		&self,
		request: &OrderRequest,
	) -> Result<PrepareOrderResponse, StagingError> {
		let order_id = parse_field_id("orderId", &request.order_id)?;
		let order = self.engine.load_order(&order_id).await?;
		TransitionEngine::check_guard(&order, OrderTransition::Refund)?;

		let descriptor = self.builder.refund_order(&order_id.to_hex())?;

		Ok(PrepareOrderResponse {
			transaction_data: descriptor,
			order_id: order_id.to_hex(),
			message: "Please sign with your wallet to refund the order to the payer.".to_string(),
		})
	}

	/// Confirms a refund of an order.
	pub async fn confirm_refund_order(
		&self,
		request: &ConfirmOrderRequest,
	) -> Result<OrderTransitionConfirmation, StagingError> {
		self.confirm_order_transition(
			&request.order_id,
			&request.transaction_hash,
			OrderTransition::Refund,
			"Order refunded successfully. Funds returned to payer.",
		)
		.await
	}

	/// Executes a platform-signed emergency withdrawal and records it.
	pub async fn emergency_withdraw(
		&self,
		request: &EmergencyWithdrawRequest,
	) -> Result<WithdrawalResponse, StagingError> {
		let token = parse_field_address("tokenAddress", &request.token_address)?;
		let receiver = parse_field_address("receiverAddress", &request.receiver_address)?;
		let amount = parse_amount("amount", &request.amount, true)?;

		let data = IPaymentProcessor::emergencyWithdrawCall {
			_token: token,
			_receiver: receiver,
			_amount: amount,
		}
		.abi_encode();

		let receipt = self.submit_platform_call(data).await?;
		let tx_hash = format!("0x{}", hex::encode(receipt.hash));

		let withdrawal = WithdrawalRecord {
			token_address: format_address(&token),
			receiver_address: format_address(&receiver),
			amount: request.amount.clone(),
			sender_address: format_address(&self.network.payment_processor_address),
			transaction_hash: tx_hash.clone(),
		};

		self.storage
			.store(StorageKey::Withdrawals.as_str(), &tx_hash, &withdrawal)
			.await
			.map_err(|e| StagingError::Persistence(e.to_string()))?;

		tracing::warn!(
			token = %withdrawal.token_address,
			receiver = %withdrawal.receiver_address,
			amount = %withdrawal.amount,
			"Emergency withdrawal executed"
		);

		Ok(WithdrawalResponse {
			explorer_url: self.explorer_url(&tx_hash),
			withdrawal,
		})
	}

	/// Toggles the emergency withdrawal switch on the payment processor.
	pub async fn set_emergency_withdrawal_enabled(
		&self,
		request: &WithdrawalToggleRequest,
	) -> Result<TransactionConfirmation, StagingError> {
		let data = IPaymentProcessor::setEmergencyWithdrawalEnabledCall {
			_enabled: request.is_withdrawal_enabled,
		}
		.abi_encode();

		let receipt = self.submit_platform_call(data).await?;
		let tx_hash = format!("0x{}", hex::encode(receipt.hash));

		let message = if request.is_withdrawal_enabled {
			"Emergency withdrawal enabled"
		} else {
			"Emergency withdrawal disabled"
		};

		Ok(TransactionConfirmation {
			message: message.to_string(),
			explorer_url: self.explorer_url(&tx_hash),
			transaction_hash: tx_hash,
		})
	}

	/// Enables or disables support for a payment token.
	pub async fn set_token_support(
		&self,
		request: &TokenSupportRequest,
	) -> Result<TransactionConfirmation, StagingError> {
		let token = parse_field_address("tokenAddress", &request.token_address)?;

		let status = match request.status_value.as_str() {
			"disabled" => U256::ZERO,
			"enabled" => U256::from(1),
			_ => {
				return Err(StagingError::validation(
					"statusValue",
					"must be 'enabled' or 'disabled'",
				))
			}
		};

		let data = IPaymentProcessor::setTokenSupportCall {
			_token: token,
			_status: status,
		}
		.abi_encode();

		let receipt = self.submit_platform_call(data).await?;
		let tx_hash = format!("0x{}", hex::encode(receipt.hash));

		Ok(TransactionConfirmation {
			message: format!("Token support {} successfully", request.status_value),
			explorer_url: self.explorer_url(&tx_hash),
			transaction_hash: tx_hash,
		})
	}

	/// Updates a merchant's verification status on chain and in storage.
	pub async fn update_merchant_verification_status(
		&self,
		request: &MerchantVerificationRequest,
	) -> Result<VerificationStatusResponse, StagingError> {
		let merchant_id = parse_field_id("merchantId", &request.merchant_id)?;
		let status: VerificationStatus =
			request.verification_status.parse().map_err(|_| {
				StagingError::validation(
					"verificationStatus",
					"must be 'pending', 'verified', 'rejected', or 'suspended'",
				)
			})?;

		let id = merchant_id.to_hex();
		let _guard = self.storage.lock(StorageKey::Merchants.as_str(), &id).await;
		let mut merchant = self.load_merchant(&merchant_id).await?;

		let data = IPaymentProcessor::updateMerchantVerificationStatusCall {
			_merchantId: merchant_id.0,
			_status: status.as_u8(),
		}
		.abi_encode();

		let receipt = self.submit_platform_call(data).await?;
		let tx_hash = format!("0x{}", hex::encode(receipt.hash));

		merchant.verification_status = status;
		merchant.transaction_hash = tx_hash.clone();
		merchant.updated_at = current_timestamp();

		self.storage
			.update(StorageKey::Merchants.as_str(), &id, &merchant)
			.await
			.map_err(|e| StagingError::Persistence(e.to_string()))?;

		tracing::info!(
			merchant_id = %truncate_id(&id),
			status = %status,
			"Merchant verification status updated"
		);

		Ok(VerificationStatusResponse {
			merchant_id: id,
			verification_status: status,
			explorer_url: self.explorer_url(&tx_hash),
		})
	}

	/// Points the payment processor at a new merchant registry.
	pub async fn update_merchant_registry(
		&self,
		request: &RegistryUpdateRequest,
	) -> Result<TransactionConfirmation, StagingError> {
		let new_registry = parse_field_address("newRegistryAddress", &request.new_registry_address)?;

		let data = IPaymentProcessor::updateMerchantRegistryCall {
			_newRegistry: new_registry,
		}
		.abi_encode();

		let receipt = self.submit_platform_call(data).await?;
		let tx_hash = format!("0x{}", hex::encode(receipt.hash));

		Ok(TransactionConfirmation {
			message: "Merchant registry updated successfully".to_string(),
			explorer_url: self.explorer_url(&tx_hash),
			transaction_hash: tx_hash,
		})
	}

	/// Queries a wallet's balance of a token.
	pub async fn get_platform_token_balance(
		&self,
		request: &PlatformBalanceRequest,
	) -> Result<BalanceResponse, StagingError> {
		let wallet = parse_field_address("platformWallet", &request.platform_wallet)?;
		let token = parse_field_address("tokenAddress", &request.token_address)?;

		let balance = self.chain.get_balance(wallet, Some(token)).await?;

		Ok(BalanceResponse {
			balance,
			message: "Balance retrieved successfully".to_string(),
		})
	}

	/// Queries the payment processor contract's balance of a token.
	pub async fn get_contract_token_balance(
		&self,
		request: &ContractBalanceRequest,
	) -> Result<BalanceResponse, StagingError> {
		let token = parse_field_address("tokenAddress", &request.token_address)?;

		let balance = self
			.chain
			.get_balance(self.network.payment_processor_address, Some(token))
			.await?;

		Ok(BalanceResponse {
			balance,
			message: "Balance retrieved successfully".to_string(),
		})
	}

	/// Submits a call to the payment processor with the platform account
	/// and waits for a successful receipt.
	async fn submit_platform_call(&self, data: Vec<u8>) -> Result<ChainReceipt, StagingError> {
		let tx_hash = self
			.chain
			.submit(ChainTransaction {
				to: self.network.payment_processor_address,
				data,
				value: U256::ZERO,
			})
			.await?;

		let receipt = self.chain.wait_for_receipt(&tx_hash).await?;
		if !receipt.success {
			return Err(StagingError::ExecutionReverted);
		}

		Ok(receipt)
	}
}
