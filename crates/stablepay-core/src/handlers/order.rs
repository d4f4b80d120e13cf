//! Order operation handlers.
//!
//! Prepare/confirm flows for the order lifecycle: token approval, order
//! creation, payment, and cancellation. Prepare steps build descriptors;
//! confirm steps verify the submitted transaction and commit the matching
//! record change.

use crate::descriptor::{
	parse_amount, parse_field_address, parse_field_hash, parse_field_id, require_non_empty,
};
use crate::engine::{OrderTransition, TransitionEngine};
use crate::verifier::ReceiptVerifier;
use crate::{StagingError, StagingService};
use stablepay_types::{
	current_timestamp, format_address, truncate_id, ApproveTokenRequest, ConfirmCreateOrderRequest,
	ConfirmOrderRequest, ConfirmTransactionRequest, CreateOrderConfirmation, CreateOrderRequest,
	OrderRecord, OrderRequest, OrderStatus, OrderTransitionConfirmation, PrepareApproveResponse,
	PrepareCreateOrderResponse, PrepareOrderResponse, StorageKey, TransactionConfirmation,
};

impl StagingService {
	/// Prepares an ERC-20 approval of the payment processor.
	pub fn prepare_approve_token(
		&self,
		request: &ApproveTokenRequest,
	) -> Result<PrepareApproveResponse, StagingError> {
		let descriptor = self
			.builder
			.approve_token(&request.token_address, &request.amount)?;

		Ok(PrepareApproveResponse {
			spender: format_address(&self.builder.payment_processor()),
			token_address: descriptor.to.clone(),
			amount: request.amount.clone(),
			transaction_data: descriptor,
			message: "Sign this transaction to approve the payment processor to spend your tokens"
				.to_string(),
		})
	}

	/// Confirms a token approval by verifying the submitted transaction.
	pub async fn confirm_approve_token(
		&self,
		request: &ConfirmTransactionRequest,
	) -> Result<TransactionConfirmation, StagingError> {
		let tx_hash = parse_field_hash("transactionHash", &request.transaction_hash)?;
		self.verifier.verify_success(&tx_hash).await?;

		Ok(TransactionConfirmation {
			message: "Token approval confirmed".to_string(),
			transaction_hash: tx_hash.to_hex(),
			explorer_url: self.explorer_url(&tx_hash.to_hex()),
		})
	}

	/// Prepares an order creation.
	pub fn prepare_create_order(
		&self,
		request: &CreateOrderRequest,
	) -> Result<PrepareCreateOrderResponse, StagingError> {
		let descriptor = self.builder.create_order(
			&request.merchant_id,
			&request.token_address,
			&request.amount,
			&request.metadata_uri,
		)?;

		Ok(PrepareCreateOrderResponse {
			transaction_data: descriptor,
			merchant_id: request.merchant_id.clone(),
			token_address: request.token_address.clone(),
			amount: request.amount.clone(),
			metadata_uri: request.metadata_uri.clone(),
			message: "Please sign with your wallet and submit the transaction hash to confirm."
				.to_string(),
		})
	}

	/// Confirms an order creation.
	///
	/// The order id is taken from the OrderCreated log of the verified
	/// transaction, never from client input.
	pub async fn confirm_create_order(
		&self,
		request: &ConfirmCreateOrderRequest,
	) -> Result<CreateOrderConfirmation, StagingError> {
		let tx_hash = parse_field_hash("transactionHash", &request.transaction_hash)?;
		let merchant_id = parse_field_id("merchantId", &request.merchant_id)?;
		let payer = parse_field_address("payerAddress", &request.payer_address)?;
		let token = parse_field_address("tokenAddress", &request.token_address)?;
		parse_amount("amount", &request.amount, true)?;
		require_non_empty("metadataURI", &request.metadata_uri)?;

		let merchant_exists = self
			.storage
			.exists(StorageKey::Merchants.as_str(), &merchant_id.to_hex())
			.await
			.map_err(|e| StagingError::Persistence(e.to_string()))?;
		if !merchant_exists {
			return Err(StagingError::MerchantNotFound(merchant_id.to_hex()));
		}

		let receipt = self.verifier.verify_success(&tx_hash).await?;
		let order_id = ReceiptVerifier::order_id_from_receipt(&receipt)?;

		let now = current_timestamp();
		let order = OrderRecord {
			order_id: order_id.to_hex(),
			merchant_id: merchant_id.to_hex(),
			payer_address: format_address(&payer),
			token_address: format_address(&token),
			amount: request.amount.clone(),
			status: OrderStatus::Created,
			metadata_uri: request.metadata_uri.clone(),
			transaction_hash: tx_hash.to_hex(),
			created_at: now,
			updated_at: now,
		};

		// store() rather than update(): re-confirming the same mined
		// transaction rewrites an identical record.
		self.storage
			.store(StorageKey::Orders.as_str(), &order.order_id, &order)
			.await
			.map_err(|e| StagingError::Persistence(e.to_string()))?;

		tracing::info!(
			order_id = %truncate_id(&order.order_id),
			merchant_id = %truncate_id(&order.merchant_id),
			"Order created"
		);

		Ok(CreateOrderConfirmation {
			explorer_url: self.explorer_url(&order.transaction_hash),
			order,
		})
	}

	/// Prepares payment of an order.
	pub fn prepare_pay_order(
		&self,
		request: &OrderRequest,
	) -> Result<PrepareOrderResponse, StagingError> {
		let order_id = parse_field_id("orderId", &request.order_id)?;
		let descriptor = self.builder.pay_order(&order_id.to_hex())?;

		Ok(PrepareOrderResponse {
			transaction_data: descriptor,
			order_id: order_id.to_hex(),
			message: "Please sign with your wallet to pay the order.".to_string(),
		})
	}

	/// Confirms payment of an order.
	pub async fn confirm_pay_order(
		&self,
		request: &ConfirmOrderRequest,
	) -> Result<OrderTransitionConfirmation, StagingError> {
		self.confirm_order_transition(
			&request.order_id,
			&request.transaction_hash,
			OrderTransition::Pay,
			"Order paid successfully",
		)
		.await
	}

	/// Prepares cancellation of an order.
	pub async fn prepare_cancel_order(
		&self,
		request: &OrderRequest,
	) -> Result<PrepareOrderResponse, StagingError> {
		let order_id = parse_field_id("orderId", &request.order_id)?;
		let order = self.engine.load_order(&order_id).await?;
		TransitionEngine::check_guard(&order, OrderTransition::Cancel)?;

		let descriptor = self.builder.cancel_order(&order_id.to_hex())?;

		Ok(PrepareOrderResponse {
			transaction_data: descriptor,
			order_id: order_id.to_hex(),
			message: "Please sign with your wallet to cancel the order.".to_string(),
		})
	}

	/// Confirms cancellation of an order.
	pub async fn confirm_cancel_order(
		&self,
		request: &ConfirmOrderRequest,
	) -> Result<OrderTransitionConfirmation, StagingError> {
		self.confirm_order_transition(
			&request.order_id,
			&request.transaction_hash,
			OrderTransition::Cancel,
			"Order cancelled successfully",
		)
		.await
	}

	/// Fetches a stored order by id.
	pub async fn get_order(&self, order_id: &str) -> Result<OrderRecord, StagingError> {
		let order_id = parse_field_id("orderId", order_id)?;
		self.engine.load_order(&order_id).await
	}

	/// Shared confirm path for guarded order transitions.
	pub(crate) async fn confirm_order_transition(
		&self,
		order_id: &str,
		transaction_hash: &str,
		transition: OrderTransition,
		message: &str,
	) -> Result<OrderTransitionConfirmation, StagingError> {
		let order_id = parse_field_id("orderId", order_id)?;
		let tx_hash = parse_field_hash("transactionHash", transaction_hash)?;

		let order = self.engine.confirm(&order_id, transition, &tx_hash).await?;

		Ok(OrderTransitionConfirmation {
			order_id: order.order_id,
			status: order.status,
			transaction_hash: order.transaction_hash.clone(),
			explorer_url: self.explorer_url(&order.transaction_hash),
			message: message.to_string(),
		})
	}
}
